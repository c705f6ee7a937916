// Stream chunking into per-frame segments

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use acmi_core::stream::segmenting::{FrameChunker, FrameSegment};

    fn chunk(input: &[u8]) -> Vec<FrameSegment> {
        FrameChunker::new(Cursor::new(input.to_vec()))
            .collect::<Result<Vec<_>, _>>()
            .unwrap()
    }

    #[test]
    fn one_segment_per_marker() {
        let segments = chunk(b"#0\n1,A=1\n#1\n-1\n#2\n");

        assert_eq!(segments.len(), 3);
        assert_eq!(&segments[0].bytes[..], b"#0\n1,A=1\n");
        assert_eq!(&segments[1].bytes[..], b"#1\n-1\n");
        assert_eq!(&segments[2].bytes[..], b"#2\n");

        for (i, seg) in segments.iter().enumerate() {
            assert_eq!(seg.segment_index, i as u64);
            assert!(seg.starts_with_marker());
        }
    }

    #[test]
    fn no_marker_yields_single_segment_without_offset() {
        let segments = chunk(b"1,A=1\n2,B=2\n");
        assert_eq!(segments.len(), 1);
        assert!(!segments[0].starts_with_marker());
    }

    #[test]
    fn empty_input_yields_nothing() {
        assert!(chunk(b"").is_empty());
    }

    #[test]
    fn final_line_without_newline_is_kept() {
        let segments = chunk(b"#0\n1,A=1");
        assert_eq!(segments.len(), 1);
        assert_eq!(&segments[0].bytes[..], b"#0\n1,A=1");
    }

    #[test]
    fn marker_inside_continuation_does_not_split() {
        let segments = chunk(b"#0\n1,Note=a\\\n#b\n#1\n2,\n");
        assert_eq!(segments.len(), 2);
        assert_eq!(&segments[0].bytes[..], b"#0\n1,Note=a\\\n#b\n");
        assert_eq!(&segments[1].bytes[..], b"#1\n2,\n");
    }

    #[test]
    fn escaped_backslash_before_newline_does_split() {
        let segments = chunk(b"#0\n1,Path=C:\\\\\n#1\n");
        assert_eq!(segments.len(), 2);
    }

    #[test]
    fn carriage_return_after_backslash_does_split() {
        let segments = chunk(b"#0\n1,Name=x\\\r\n#1\n2,\n");
        assert_eq!(segments.len(), 2);
        assert_eq!(&segments[1].bytes[..], b"#1\n2,\n");
    }

    #[test]
    fn counts_bytes_and_segments() {
        let input = b"#0\n1,A=1\n#1\n";
        let mut chunker = FrameChunker::new(Cursor::new(input.to_vec()));
        while chunker.next_segment().unwrap().is_some() {}

        assert_eq!(chunker.bytes_read(), input.len() as u64);
        assert_eq!(chunker.segments_emitted(), 2);
        assert!(chunker.next_segment().unwrap().is_none());
    }

    #[test]
    fn summary_names_first_line() {
        let segments = chunk(b"#4.25\n1,\n");
        let summary = segments[0].summary();
        assert!(summary.contains("index: 0"));
        assert!(summary.contains("#4.25"));
    }
}
