// Unit tests for domain models

#[cfg(test)]
mod tests {
    use crate::domain::errors::*;
    use crate::domain::model::*;

    fn assert_invalid_time(raw: &str) {
        match TimeSpec::parse(raw) {
            Err(DomainError::InvalidTimeFormat { input, .. }) => assert_eq!(input, raw),
            other => panic!("expected InvalidTimeFormat for {:?}, got {:?}", raw, other),
        }
    }

    #[test]
    fn test_time_spec_parse_seconds_only() {
        assert_eq!(parse_seconds("90").unwrap(), 90);
        assert_eq!(parse_seconds("0").unwrap(), 0);
        assert_eq!(parse_seconds("007").unwrap(), 7);
    }

    #[test]
    fn test_time_spec_parse_mm_ss() {
        assert_eq!(parse_seconds("1:30").unwrap(), 90);
        assert_eq!(parse_seconds("00:59").unwrap(), 59);
    }

    #[test]
    fn test_time_spec_parse_hh_mm_ss() {
        assert_eq!(parse_seconds("0:1:30").unwrap(), 90);
        assert_eq!(parse_seconds("1:31:30").unwrap(), 5490);
        assert_eq!(parse_seconds("2:00:00").unwrap(), 7200);
    }

    #[test]
    fn test_time_spec_hours_unbounded() {
        assert_eq!(parse_seconds("100:00:00").unwrap(), 360_000);
    }

    #[test]
    fn test_time_spec_parse_invalid() {
        for raw in ["", ":30", "30:", "1::2", "1:2:3:4", "1:60", "0:60:00", "1:00:60", "ab:cd"] {
            assert_invalid_time(raw);
        }
    }

    #[test]
    fn test_time_spec_rejects_signs_and_whitespace() {
        for raw in ["-5", "+5", " 5", "1: 30", "1.5", "١٢"] {
            assert_invalid_time(raw);
        }
    }

    #[test]
    fn test_time_spec_component_overflow() {
        assert_invalid_time("4294967296");
        assert_eq!(parse_seconds("4294967295").unwrap(), 4_294_967_295);
        assert_eq!(
            parse_seconds("4294967295:59:59").unwrap(),
            4_294_967_295u64 * 3600 + 59 * 60 + 59
        );
    }

    #[test]
    fn test_clip_window_accessors() {
        let window = ClipWindow::Range {
            start: 10,
            end: Some(40),
        };
        assert!(window.is_clipped());
        assert_eq!(window.start(), Some(10));
        assert_eq!(window.end(), Some(40));

        assert!(!ClipWindow::Unclipped.is_clipped());
        assert_eq!(ClipWindow::Unclipped.start(), None);
    }

    #[test]
    fn test_quality_parse() {
        assert_eq!("256".parse::<Quality>().unwrap().kbps(), 256);
        assert!(Quality::default().is_default());
        assert_eq!(
            "100".parse::<Quality>(),
            Err(DomainError::InvalidQuality("100".to_string()))
        );
        assert!("loud".parse::<Quality>().is_err());
    }

    #[test]
    fn test_format_token_normalised() {
        assert_eq!(FormatToken::new(" MP4 ").as_str(), "mp4");
        assert_eq!(FormatToken::default().as_str(), "mp3");
    }

    #[test]
    fn test_request_url_validation() {
        assert_eq!(
            DownloadRequest::new("   ").validated_url(),
            Err(DomainError::EmptyInput)
        );
        assert_eq!(
            DownloadRequest::new(" https://youtu.be/x ").validated_url(),
            Ok("https://youtu.be/x")
        );
    }

    #[test]
    fn test_clip_directive_section() {
        let bounded = ClipDirective {
            start: 60,
            end: Some(120),
            snap_to_keyframes: true,
        };
        assert_eq!(bounded.section(), "*60-120");

        let open = ClipDirective {
            start: 10,
            end: None,
            snap_to_keyframes: true,
        };
        assert_eq!(open.section(), "*10-inf");
    }
}
