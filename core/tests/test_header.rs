// Header bootstrap and header encoding

#[cfg(test)]
mod tests {
    use std::io::{BufRead, Cursor};

    use chrono::{TimeZone, Utc};

    use acmi_core::headers::{Header, HeaderError, parse_reference_time, read_header, write_header};
    use acmi_core::stream::framing::FrameError;

    const HEADER: &str = "FileType=text/acmi/tacview\n\
                          FileVersion=2.2\n\
                          0,ReferenceTime=2023-01-01T00:00:00Z,Title=Sortie\n\
                          1,Name=Tower\n";

    fn read(text: &str) -> Result<Header, HeaderError> {
        read_header(&mut Cursor::new(text.as_bytes().to_vec()))
    }

// # ✅ Decoding

    #[test]
    fn reads_tags_and_reference_time() {
        let header = read(HEADER).unwrap();

        assert_eq!(header.file_type, "text/acmi/tacview");
        assert_eq!(header.file_version, "2.2");
        assert_eq!(header.reference_time, Utc.with_ymd_and_hms(2023, 1, 1, 0, 0, 0).unwrap());

        assert_eq!(header.initial_time_frame.offset, 0.0);
        assert_eq!(header.initial_time_frame.objects.len(), 2);
        assert_eq!(header.global_object().unwrap().get("Title").unwrap().value, "Sortie");
    }

    #[test]
    fn reader_is_left_on_first_frame() {
        let text = format!("{HEADER}#1.5\n1,T=1|2|3\n");
        let mut reader = Cursor::new(text.into_bytes());
        read_header(&mut reader).unwrap();

        let mut next = String::new();
        reader.read_line(&mut next).unwrap();
        assert_eq!(next, "#1.5\n");
    }

    #[test]
    fn tag_order_does_not_matter() {
        let header = read(
            "FileVersion=2.1\nFileType=text/acmi/tacview\n0,ReferenceTime=2020-05-06T07:08:09Z\n",
        )
        .unwrap();
        assert_eq!(header.file_version, "2.1");
        assert_eq!(header.file_type, "text/acmi/tacview");
    }

    #[test]
    fn other_keys_are_skipped() {
        let header = read(
            "FileType=text/acmi/tacview\nComment=x\nFileVersion=2.2\n0,ReferenceTime=2023-01-01T00:00:00Z\n",
        )
        .unwrap();
        assert_eq!(header.file_version, "2.2");
    }

    #[test]
    fn key_value_split_at_last_equals() {
        let header = read("FileType=a=b\nFileVersion=2.2\n0,ReferenceTime=2023-01-01T00:00:00Z\n");
        // "FileType=a" is not a known key, so FileType is never seen
        assert!(matches!(header, Err(HeaderError::HeaderIncomplete(_))));
    }

    #[test]
    fn first_tag_occurrence_wins() {
        let header = read(
            "FileType=text/acmi/tacview\nFileType=other\nFileVersion=2.2\n0,ReferenceTime=2023-01-01T00:00:00Z\n",
        )
        .unwrap();
        assert_eq!(header.file_type, "text/acmi/tacview");
    }

    #[test]
    fn crlf_header_is_accepted() {
        let header = read(
            "FileType=text/acmi/tacview\r\nFileVersion=2.2\r\n0,ReferenceTime=2023-01-01T00:00:00Z\r\n",
        )
        .unwrap();
        assert_eq!(header.file_version, "2.2");
    }

// # ❌ Rejections

    #[test]
    fn missing_global_object_is_incomplete() {
        let result = read("FileType=text/acmi/tacview\nFileVersion=2.2\n1,Name=x\n");
        assert!(matches!(result, Err(HeaderError::HeaderIncomplete(_))));
    }

    #[test]
    fn missing_reference_time_is_incomplete() {
        let result = read("FileType=text/acmi/tacview\nFileVersion=2.2\n0,Title=x\n");
        assert!(matches!(result, Err(HeaderError::HeaderIncomplete(_))));
    }

    #[test]
    fn truncated_tags_are_incomplete() {
        assert!(matches!(read("FileType=text/acmi/tacview\n"), Err(HeaderError::HeaderIncomplete(_))));
        assert!(matches!(read(""), Err(HeaderError::HeaderIncomplete(_))));
    }

    #[test]
    fn tag_line_without_equals() {
        assert!(matches!(read("garbage\n"), Err(HeaderError::MalformedKeyValue(_))));
    }

    #[test]
    fn invalid_utf8_tag_line_is_malformed() {
        let result = read_header(&mut Cursor::new(b"FileType=\xff\xfe\n".to_vec()));
        assert!(matches!(result, Err(HeaderError::MalformedKeyValue(_))));
    }

    #[test]
    fn bad_reference_time() {
        let result = read("FileType=t\nFileVersion=2.2\n0,ReferenceTime=yesterday\n");
        assert!(matches!(result, Err(HeaderError::InvalidReferenceTime(raw)) if raw == "yesterday"));
    }

    #[test]
    fn bad_initial_frame_is_a_frame_error() {
        let result = read("FileType=t\nFileVersion=2.2\n0,Broken\n");
        assert!(matches!(result, Err(HeaderError::Frame(FrameError::MalformedProperty(_)))));
    }

    #[test]
    fn parse_reference_time_rejects_offsets() {
        assert!(parse_reference_time("2023-01-01T00:00:00Z").is_ok());
        assert!(parse_reference_time("2023-01-01T00:00:00+02:00").is_err());
    }

// # ✅ Encoding

    #[test]
    fn new_header_writes_and_reads_back() {
        let when = Utc.with_ymd_and_hms(2024, 2, 29, 12, 30, 45).unwrap();
        let header = Header::new(when);

        let mut out = Vec::new();
        write_header(&mut out, &header).unwrap();
        assert_eq!(
            String::from_utf8(out.clone()).unwrap(),
            "FileType=text/acmi/tacview\nFileVersion=2.2\n0,ReferenceTime=2024-02-29T12:30:45Z\n"
        );

        let back = read_header(&mut Cursor::new(out)).unwrap();
        assert_eq!(back, header);
    }
}
