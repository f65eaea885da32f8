//! The deduction layer driven by real pipeline output, across
//! regenerations.

#![allow(clippy::unwrap_used)]

use enigma_deduction::{DeductionStore, KEY_SENTENCE_ID, SlotBoard, SlotStatus};
use enigma_pipeline::{Dimensions, GenerationParams, Painting, process};
use image::{ImageFormat, Rgba, RgbaImage};

/// Black left half, white right half.
fn half_black_png() -> Vec<u8> {
    let img = RgbaImage::from_fn(800, 800, |x, _| {
        if x < 400 {
            Rgba([0, 0, 0, 255])
        } else {
            Rgba([255, 255, 255, 255])
        }
    });
    let mut buf = Vec::new();
    img.write_to(&mut std::io::Cursor::new(&mut buf), ImageFormat::Png)
        .unwrap();
    buf
}

fn paint(complexity: u32) -> Painting {
    let params = GenerationParams {
        seed: 7,
        complexity,
        threshold: 130,
        canvas: Dimensions::CANVAS,
    };
    process(Some(half_black_png().as_slice()), &params)
}

#[test]
fn one_clue_per_cell() {
    let painting = paint(150);
    let store = DeductionStore::from_cells(&painting.cells);
    assert_eq!(store.clue_count(), painting.cells.len());
    assert_eq!(store.sentence_count(), 2);
    for cell in &painting.cells {
        let clue = store.clue(&format!("cell-{}", cell.id)).unwrap();
        assert_eq!(clue.cell_refs[0].region_id, cell.region_id());
    }
}

#[test]
fn flags_survive_lower_complexity() {
    let mut store = DeductionStore::from_cells(&paint(150).cells);
    store.set_clue_discovered("cell-0", true);
    store.set_clue_discovered("cell-120", true);

    let smaller = paint(100);
    store.hydrate_cells(&smaller.cells);
    assert_eq!(store.clue_count(), smaller.cells.len());
    assert!(store.clue("cell-0").unwrap().discovered);
    assert!(store.clue("cell-120").is_none());
    assert!(store.clues().iter().all(|c| c.number() <= 100));
}

#[test]
fn solved_sentence_stays_validated_after_regeneration() {
    let painting = paint(150);
    let mut store = DeductionStore::from_cells(&painting.cells);
    let key = store.sentence(KEY_SENTENCE_ID).unwrap().clone();
    for slot in &key.slots {
        store.set_clue_discovered(&slot.clue_id, true);
    }

    let mut board = SlotBoard::new(&store);
    for slot in &key.slots {
        board.assign(&store, &slot.id, &slot.clue_id).unwrap();
        assert_eq!(board.status(&slot.id), Some(SlotStatus::Correct));
    }
    assert!(board.is_solved(&key));
    assert_eq!(board.apply_validation(&mut store), 1);

    // Same parameters reproduce the same ids.
    store.hydrate_cells(&paint(150).cells);
    board.sync(&store);
    assert!(store.sentence(KEY_SENTENCE_ID).unwrap().validated);
    assert!(key.slots.iter().all(|s| board.assignment(&s.id) == Some(s.clue_id.as_str())));
}

#[test]
fn book_serializes_with_camel_case_keys() {
    let store = DeductionStore::from_cells(&paint(10).cells);
    let json = serde_json::to_value(store.book()).unwrap();
    let first = &json["clues"][0];
    assert_eq!(first["id"], "cell-0");
    assert_eq!(first["title"], "Cell 1");
    assert_eq!(first["cellRefs"][0]["shapeId"], 0);
    assert_eq!(first["discovered"], false);
    assert!(json["sentences"][0]["slots"][0]["clueId"].is_string());
}
