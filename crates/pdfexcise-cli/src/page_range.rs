/// Parse a page range like "286,314" or "286-314" into 1-indexed
/// `(start, end)` page numbers.
///
/// Only the shape is checked here; whether the range fits the document is
/// decided when the pages are extracted.
pub fn parse_page_range(input: &str) -> Result<(usize, usize), String> {
    const FORMAT_HINT: &str =
        "invalid page range format, use 'start,end' or 'start-end' (e.g. '286,314')";

    let input = input.trim();
    let (start_str, end_str) = input
        .split_once(',')
        .or_else(|| input.split_once('-'))
        .ok_or_else(|| FORMAT_HINT.to_string())?;
    if end_str.contains([',', '-']) {
        return Err(FORMAT_HINT.to_string());
    }

    let start: usize = start_str
        .trim()
        .parse()
        .map_err(|_| format!("invalid page number: '{}'", start_str.trim()))?;
    let end: usize = end_str
        .trim()
        .parse()
        .map_err(|_| format!("invalid page number: '{}'", end_str.trim()))?;

    if start == 0 {
        return Err("start page must be >= 1".to_string());
    }
    if end < start {
        return Err(format!(
            "end page ({end}) must be >= start page ({start})"
        ));
    }
    Ok((start, end))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn comma_form() {
        assert_eq!(parse_page_range("286,314").unwrap(), (286, 314));
    }

    #[test]
    fn dash_form() {
        assert_eq!(parse_page_range("10-20").unwrap(), (10, 20));
    }

    #[test]
    fn whitespace_is_ignored() {
        assert_eq!(parse_page_range(" 2 , 3 ").unwrap(), (2, 3));
    }

    #[test]
    fn single_page_range() {
        assert_eq!(parse_page_range("5,5").unwrap(), (5, 5));
    }

    #[test]
    fn missing_separator() {
        assert!(parse_page_range("12").unwrap_err().contains("format"));
    }

    #[test]
    fn too_many_parts() {
        assert!(parse_page_range("1,2,3").is_err());
        assert!(parse_page_range("1-2-3").is_err());
    }

    #[test]
    fn non_numeric() {
        assert_eq!(
            parse_page_range("a,3").unwrap_err(),
            "invalid page number: 'a'"
        );
    }

    #[test]
    fn page_zero() {
        assert_eq!(
            parse_page_range("0,3").unwrap_err(),
            "start page must be >= 1"
        );
    }

    #[test]
    fn reversed() {
        assert_eq!(
            parse_page_range("5-2").unwrap_err(),
            "end page (2) must be >= start page (5)"
        );
    }
}
