#![allow(clippy::expect_used, clippy::unwrap_used)]
//! Integration tests for pointer tables inside complete archives

use ehp_formats::archive::{EntryIndex, RepackEntry, repack_archive, unpack_archive};
use ehp_formats::diagnostics::Warning;
use ehp_formats::pointer::{PointerFormat, PointerTable, PointerTarget, version};
use pretty_assertions::assert_eq;

fn entry_text(data: &[u8], name: &str) -> String {
    let unpacked = unpack_archive(data, false).expect("Should unpack");
    let entry = unpacked.entry(name).expect("Entry should exist");
    String::from_utf8(entry.bytes().into_owned()).expect("Pointer text is UTF-8")
}

fn anim_table(slots: usize, version: Option<u8>) -> PointerTable {
    let mut targets = vec![PointerTarget::Null; slots];
    targets[0] = PointerTarget::Entry("duel.bin".to_string());
    PointerTable::from_targets(PointerFormat::Sparse, targets).with_version(version)
}

#[test]
fn known_size_gets_version_header() {
    let size = version::size_for_version(3).unwrap();
    assert_eq!(size, 0xAD4);

    let repacked = repack_archive(
        &[
            RepackEntry::bytes("duel.bin", vec![1; 8]),
            RepackEntry::pointer_table("all-ptrs.txt", anim_table(size as usize / 4, Some(3))),
        ],
        false,
    )
    .expect("Should repack");

    let index = EntryIndex::parse(&repacked.data).unwrap();
    assert_eq!(index.by_name("all-ptrs.txt").unwrap().size, 0xAD4);

    let text = entry_text(&repacked.data, "all-ptrs.txt");
    let mut lines = text.lines();
    assert_eq!(lines.next(), Some("TF3"));
    assert_eq!(lines.next(), Some("0 = duel.bin"));
    assert_eq!(lines.next(), Some("1 = NULL"));
    assert_eq!(text.lines().count(), 1 + 0xAD4 / 4);

    let unpacked = unpack_archive(&repacked.data, false).unwrap();
    assert!(unpacked.warnings.is_empty());
}

#[test]
fn unknown_size_has_no_header() {
    let repacked = repack_archive(
        &[
            RepackEntry::bytes("duel.bin", vec![1; 8]),
            RepackEntry::pointer_table("all-ptrs.txt", anim_table(5, None)),
        ],
        false,
    )
    .expect("Should repack");

    let text = entry_text(&repacked.data, "all-ptrs.txt");
    assert_eq!(text.lines().next(), Some("0 = duel.bin"));

    let unpacked = unpack_archive(&repacked.data, false).unwrap();
    assert_eq!(
        unpacked.warnings,
        vec![Warning::UnknownPointerFormat {
            table: "all-ptrs.txt".to_string(),
            size: 20
        }]
    );
    assert!(unpacked.warnings[0].is_notice());
}

#[test]
fn header_line_does_not_count_as_slot() {
    let repacked = repack_archive(
        &[
            RepackEntry::bytes("duel.bin", vec![1; 8]),
            RepackEntry::text("all-ptrs.txt", "tf1\n0 = duel.bin\n1 = END\n\n"),
        ],
        false,
    )
    .expect("Should repack");

    let index = EntryIndex::parse(&repacked.data).unwrap();
    assert_eq!(index.by_name("all-ptrs.txt").unwrap().size, 8);
}

#[test]
fn equals_sign_selects_sparse_parsing() {
    // Index-tagged text is honoured whatever the table is called
    let repacked = repack_archive(
        &[
            RepackEntry::bytes("a.bin", vec![1]),
            RepackEntry::bytes("b.bin", vec![2]),
            RepackEntry::text("bg-ptrs.txt", "1 = a.bin\n0 = b.bin"),
            RepackEntry::text("all-ptrs.txt", "a.bin\nb.bin"),
        ],
        false,
    )
    .expect("Should repack");

    let index = EntryIndex::parse(&repacked.data).unwrap();
    let a = index.by_name("a.bin").unwrap().data_offset as i32;
    let b = index.by_name("b.bin").unwrap().data_offset as i32;
    let words = |name: &str| -> Vec<i32> {
        let file = index.by_name(name).unwrap();
        index
            .payload(&repacked.data, file)
            .unwrap()
            .chunks_exact(4)
            .map(|c| i32::from_le_bytes(c.try_into().unwrap()))
            .collect()
    };

    assert_eq!(words("bg-ptrs.txt"), vec![b, a]);
    assert_eq!(words("all-ptrs.txt"), vec![a, b]);

    // Rendering depends only on the archive name
    assert_eq!(entry_text(&repacked.data, "bg-ptrs.txt"), "b.bin\na.bin");
    assert_eq!(entry_text(&repacked.data, "all-ptrs.txt"), "0 = a.bin\n1 = b.bin");
}

#[test]
fn end_sentinel_is_all_ones() {
    let repacked = repack_archive(&[RepackEntry::text("x-ptrs.txt", "end")], false)
        .expect("Should repack");
    let index = EntryIndex::parse(&repacked.data).unwrap();
    let file = index.by_name("x-ptrs.txt").unwrap();

    assert_eq!(index.payload(&repacked.data, file).unwrap(), &[0xFF; 4]);
    assert_eq!(entry_text(&repacked.data, "x-ptrs.txt"), "END");
}

#[test]
fn missing_target_is_null_with_single_warning() {
    let repacked = repack_archive(
        &[RepackEntry::text("x-ptrs.txt", "gone.bin\nEND")],
        false,
    )
    .expect("Should repack");

    assert_eq!(
        repacked.warnings,
        vec![Warning::UnresolvedReference {
            table: "x-ptrs.txt".to_string(),
            target: "gone.bin".to_string()
        }]
    );
    let index = EntryIndex::parse(&repacked.data).unwrap();
    let file = index.by_name("x-ptrs.txt").unwrap();
    assert_eq!(
        &index.payload(&repacked.data, file).unwrap()[..4],
        &[0; 4]
    );
}
