use comment_lister_core::{LexEvent, aggregate, extract_comments};
use proptest::prelude::*;

fn event_stream() -> impl Strategy<Value = Vec<LexEvent>> {
    prop::collection::vec((0u8..4, 1usize..3, 0usize..3, "[a-z#= ]{0,8}\n"), 0..40).prop_map(
        |raw| {
            let mut line = 0;
            raw.into_iter()
                .map(|(kind, gap, column, text)| {
                    line += gap;
                    match kind {
                        0 => LexEvent::line_comment(text, line, column),
                        1 => LexEvent::block_begin(text, line, column),
                        2 => LexEvent::block_body(text, line),
                        _ => LexEvent::block_end(text, line),
                    }
                })
                .collect()
        },
    )
}

fn concat<'a>(texts: impl Iterator<Item = &'a str>) -> String {
    texts.collect()
}

proptest! {
    #[test]
    fn test_independent_runs_agree(events in event_stream()) {
        prop_assert_eq!(aggregate(events.clone()), aggregate(events));
    }

    #[test]
    fn test_records_are_well_formed_and_ordered(events in event_stream()) {
        let records = aggregate(events);
        for r in &records {
            prop_assert!(r.end_line >= r.start_line);
        }
        for pair in records.windows(2) {
            prop_assert!(pair[0].start_line <= pair[1].start_line);
        }
    }

    #[test]
    fn test_no_text_is_lost_without_end_markers(events in event_stream()) {
        let events: Vec<_> = events
            .into_iter()
            .filter(|e| !matches!(e, LexEvent::BlockDocEnd { .. }))
            .collect();
        let records = aggregate(events.clone());
        prop_assert_eq!(
            concat(records.iter().map(|r| r.text.as_str())),
            concat(events.iter().map(LexEvent::text))
        );
    }

    #[test]
    fn test_output_never_exceeds_input(events in event_stream()) {
        let input_len: usize = events.iter().map(|e| e.text().len()).sum();
        let records = aggregate(events.clone());
        let output_len: usize = records.iter().map(|r| r.text.len()).sum();
        prop_assert!(output_len <= input_len);
        prop_assert!(records.len() <= events.len());
    }

    #[test]
    fn test_line_comment_runs_split_on_gap_or_column(
        cols in prop::collection::vec((0usize..2, 1usize..3), 1..30)
    ) {
        let mut line = 0;
        let mut prev: Option<(usize, usize)> = None;
        let mut expected = 0;
        let mut events = Vec::new();
        for (column, gap) in cols {
            line += gap;
            if prev.is_none_or(|(pl, pc)| pl + 1 != line || pc != column) {
                expected += 1;
            }
            prev = Some((line, column));
            events.push(LexEvent::line_comment("#\n", line, column));
        }
        prop_assert_eq!(aggregate(events).len(), expected);
    }

    #[test]
    fn test_lexer_never_panics(source in "\\PC{0,300}") {
        let records = extract_comments(&source);
        for r in &records {
            prop_assert!(r.start_line >= 1);
            prop_assert!(r.end_line >= r.start_line);
        }
    }
}
