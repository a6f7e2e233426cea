use mythic_tree::{LineIndex, parse};
use proptest::prelude::*;

proptest! {
    #[test]
    fn offset_position_round_trip(source in "[a-z {}:#\\-\n\r\t]{0,200}") {
        let index = LineIndex::new(&source);
        for offset in 0..=source.len() as u32 {
            let pos = index.offset_to_position(offset);
            prop_assert_eq!(index.position_to_offset(pos), offset);
        }
    }

    #[test]
    fn reader_never_panics_and_spans_stay_in_bounds(source in "[a-z0-9 \\-:#\"'\\[\\]{},\n]{0,200}") {
        let parsed = parse(&source);
        for error in &parsed.errors {
            prop_assert!(error.span.end as usize <= source.len());
        }
        if let Some(root) = parsed.root {
            prop_assert!(root.span().end as usize <= source.len());
        }
    }
}

#[test]
fn multibyte_text_round_trips_on_char_boundaries() {
    let source = "Display: '&cÖrk Häuptling'\nHealth: 20\n";
    let index = LineIndex::new(source);
    for (offset, _) in source.char_indices() {
        let pos = index.offset_to_position(offset as u32);
        assert_eq!(index.position_to_offset(pos), offset as u32);
    }
}
