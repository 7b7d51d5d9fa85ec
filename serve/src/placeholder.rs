use lambda_http::{
    http::{
        header::{CACHE_CONTROL, CONTENT_TYPE},
        StatusCode,
    },
    Error, Response,
};

const MAX_DIMENSION: u32 = 4096;
const DEFAULT_TEXT: &str = "No Image";
const BACKGROUND: &str = "#e5e5e5";
const FOREGROUND: &str = "#666666";
const FONT_SIZE: u32 = 30;

/// `dimensions` is the path tail after `/api/placeholder/`, i.e. `{w}/{h}`.
pub fn placeholder(dimensions: &str, text: Option<&str>) -> Result<Response<String>, Error> {
    let Some((width, height)) = parse_dimensions(dimensions) else {
        return Ok(Response::builder()
            .status(StatusCode::BAD_REQUEST)
            .body(format!("invalid placeholder size: {dimensions}"))?);
    };

    Ok(Response::builder()
        .status(StatusCode::OK)
        .header(CONTENT_TYPE, "image/svg+xml")
        .header(CACHE_CONTROL, "public, max-age=86400")
        .body(render_svg(
            width,
            height,
            text.filter(|text| !text.is_empty()).unwrap_or(DEFAULT_TEXT),
        ))?)
}

fn parse_dimensions(dimensions: &str) -> Option<(u32, u32)> {
    let (width, height) = dimensions.split_once('/')?;
    let parse = |raw: &str| {
        raw.parse::<u32>()
            .ok()
            .filter(|value| (1..=MAX_DIMENSION).contains(value))
    };
    Some((parse(width)?, parse(height)?))
}

fn render_svg(width: u32, height: u32, text: &str) -> String {
    format!(
        concat!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" "#,
            r#"width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#,
            r#"<rect width="100%" height="100%" fill="{bg}"/>"#,
            r#"<text x="50%" y="50%" dominant-baseline="middle" text-anchor="middle" "#,
            r#"font-family="sans-serif" font-size="{size}" fill="{fg}">{text}</text>"#,
            "</svg>"
        ),
        w = width,
        h = height,
        bg = BACKGROUND,
        fg = FOREGROUND,
        size = FONT_SIZE,
        text = escape_xml(text),
    )
}

fn escape_xml(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dimensions_must_be_positive_and_bounded() {
        assert_eq!(parse_dimensions("120/120"), Some((120, 120)));
        assert_eq!(parse_dimensions("300/1"), Some((300, 1)));
        assert_eq!(parse_dimensions("0/120"), None);
        assert_eq!(parse_dimensions("120/5000"), None);
        assert_eq!(parse_dimensions("abc/120"), None);
        assert_eq!(parse_dimensions("120"), None);
        assert_eq!(parse_dimensions("120/120/3"), None);
    }

    #[test]
    fn default_text_is_used() {
        let response = placeholder("300/300", None).unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.body().contains(">No Image</text>"));
        assert!(response.body().contains(r##"fill="#e5e5e5""##));

        let response = placeholder("120/120", Some("")).unwrap();
        assert!(response.body().contains(">No Image</text>"));
    }

    #[test]
    fn text_is_escaped() {
        let svg = render_svg(10, 10, r#"<b>"Tom & Jerry"</b>"#);
        assert!(svg.contains("&lt;b&gt;&quot;Tom &amp; Jerry&quot;&lt;/b&gt;"));
        assert!(!svg.contains("<b>"));
    }

    #[test]
    fn bad_size_is_a_client_error() {
        let response = placeholder("wide/tall", Some("x")).unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
