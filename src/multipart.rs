//! RFC 7578 multipart/form-data body construction
//!
//! Builds byte-exact multipart bodies for upload POSTs: quoted or RFC 2231
//! extended header parameters, CRLF framing, and a randomly generated
//! boundary token guaranteed not to occur inside any part.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use rand::RngCore;

/// Random bytes per boundary candidate. 24 bytes encode to a clean 32-char
/// URL-safe base64 token; total boundary length stays under the 70-char
/// RFC 2046 cap.
const BOUNDARY_ENTROPY_BYTES: usize = 24;

/// Format a header parameter as the bytes following `name` in a header line.
///
/// Values that are pure ASCII and contain none of `"`, `\`, CR, LF render as
/// `name="value"`. Everything else falls back to the RFC 2231 extended form
/// `name*=utf-8''<pct-encoded>` over the UTF-8 bytes of the full value, with
/// an empty language tag. Every value has a rendering; this never fails.
pub fn encode_param(name: &str, value: &str) -> Vec<u8> {
    let quotable =
        value.is_ascii() && !value.chars().any(|c| matches!(c, '"' | '\\' | '\r' | '\n'));
    if quotable {
        format!("{name}=\"{value}\"").into_bytes()
    } else {
        // urlencoding escapes every byte outside A-Za-z0-9-._~ as uppercase %XX
        format!("{name}*=utf-8''{}", urlencoding::encode(value)).into_bytes()
    }
}

/// Explicit byte-substring search.
fn contains_bytes(haystack: &[u8], needle: &[u8]) -> bool {
    !needle.is_empty()
        && needle.len() <= haystack.len()
        && haystack.windows(needle.len()).any(|window| window == needle)
}

/// A single section of a multipart body: ordered header lines plus an
/// immutable raw payload.
///
/// The first header line is always `Content-Disposition: form-data` carrying
/// at least a `name` parameter; it is seeded at construction, so a part
/// without a disposition cannot exist.
#[derive(Debug, Clone)]
pub struct FormPart {
    headers: Vec<Vec<u8>>,
    body: Vec<u8>,
}

impl FormPart {
    /// Create a part with its Content-Disposition seeded with `name`.
    pub fn new(name: &str, body: Vec<u8>) -> Self {
        let mut disposition = b"Content-Disposition: form-data".to_vec();
        disposition.extend_from_slice(b"; ");
        disposition.extend_from_slice(&encode_param("name", name));
        Self {
            headers: vec![disposition],
            body,
        }
    }

    /// Append a parameter to the Content-Disposition line.
    pub fn add_param(&mut self, name: &str, value: &str) {
        // headers is seeded at construction, never empty
        if let Some(line) = self.headers.first_mut() {
            line.extend_from_slice(b"; ");
            line.extend_from_slice(&encode_param(name, value));
        }
    }

    /// Append a header line `Name: value` with optional `; `-joined parameters.
    pub fn add_header(&mut self, name: &str, value: &str, params: &[(&str, &str)]) {
        let mut line = format!("{name}: {value}").into_bytes();
        for (param_name, param_value) in params {
            line.extend_from_slice(b"; ");
            line.extend_from_slice(&encode_param(param_name, param_value));
        }
        self.headers.push(line);
    }

    /// Wire bytes of this part: header lines CRLF-joined, a blank line, then
    /// the raw payload.
    pub fn render(&self) -> Vec<u8> {
        let mut out = Vec::new();
        for header in &self.headers {
            out.extend_from_slice(header);
            out.extend_from_slice(b"\r\n");
        }
        out.extend_from_slice(b"\r\n");
        out.extend_from_slice(&self.body);
        out
    }

    /// Whether `needle` occurs anywhere in the rendered bytes of this part.
    fn contains(&self, needle: &[u8]) -> bool {
        contains_bytes(&self.render(), needle)
    }
}

/// An ordered multipart/form-data body with a lazily chosen, collision-free
/// boundary.
///
/// Parts are appended through [`add_text`](Self::add_text) and
/// [`add_file`](Self::add_file) and transmitted in insertion order. The
/// boundary is picked on first use and re-validated against the full part
/// set on every access, so appending a part that happens to contain a
/// previously chosen boundary triggers regeneration instead of producing a
/// corrupt body.
#[derive(Debug, Default)]
pub struct FormBody {
    parts: Vec<FormPart>,
    boundary: Option<Vec<u8>>,
}

impl FormBody {
    /// Create an empty body.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a text field. The payload is the UTF-8 encoding of `value`.
    pub fn add_text(&mut self, name: &str, value: &str) {
        let mut part = FormPart::new(name, value.as_bytes().to_vec());
        part.add_header("Content-Type", "text/plain", &[("charset", "utf-8")]);
        part.add_header("Content-Transfer-Encoding", "8bit", &[]);
        self.parts.push(part);
    }

    /// Append a file field with a verbatim byte payload.
    ///
    /// `filename` is carried as a disposition parameter (extended form when it
    /// cannot be quoted); `mime` defaults to `application/octet-stream`.
    pub fn add_file(&mut self, name: &str, bytes: Vec<u8>, filename: Option<&str>, mime: Option<&str>) {
        let mut part = FormPart::new(name, bytes);
        if let Some(filename) = filename {
            part.add_param("filename", filename);
        }
        part.add_header(
            "Content-Type",
            mime.unwrap_or("application/octet-stream"),
            &[],
        );
        part.add_header("Content-Transfer-Encoding", "binary", &[]);
        self.parts.push(part);
    }

    /// The boundary token for this body.
    ///
    /// A cached boundary is re-validated against every current part; if a
    /// part appended since the last call now contains it, a fresh one is
    /// generated. New candidates are rejection-sampled without an iteration
    /// cap; with 24 bytes of entropy the expected number of iterations is
    /// one.
    pub fn boundary(&mut self) -> Vec<u8> {
        if let Some(boundary) = self.boundary.clone() {
            if self.parts.iter().any(|part| part.contains(&boundary)) {
                self.boundary = None;
            } else {
                return boundary;
            }
        }
        loop {
            let candidate = random_boundary();
            if !self.parts.iter().any(|part| part.contains(&candidate)) {
                self.boundary = Some(candidate.clone());
                return candidate;
            }
        }
    }

    /// The `Content-Type` header value matching [`render`](Self::render).
    pub fn content_type(&mut self) -> String {
        let boundary = self.boundary();
        format!(
            "multipart/form-data; boundary=\"{}\"",
            String::from_utf8_lossy(&boundary)
        )
    }

    /// The full wire body.
    ///
    /// For each part in insertion order: `--boundary`, CRLF, the rendered
    /// part, CRLF; after the last part the closing `--boundary--` and CRLF.
    /// Idempotent: rendering twice without appending yields identical bytes.
    pub fn render(&mut self) -> Vec<u8> {
        let boundary = self.boundary();
        let mut out = Vec::new();
        for part in &self.parts {
            out.extend_from_slice(b"--");
            out.extend_from_slice(&boundary);
            out.extend_from_slice(b"\r\n");
            out.extend_from_slice(&part.render());
            out.extend_from_slice(b"\r\n");
        }
        out.extend_from_slice(b"--");
        out.extend_from_slice(&boundary);
        out.extend_from_slice(b"--\r\n");
        out
    }
}

fn random_boundary() -> Vec<u8> {
    let mut entropy = [0u8; BOUNDARY_ENTROPY_BYTES];
    rand::thread_rng().fill_bytes(&mut entropy);
    let mut boundary = b"-=".to_vec();
    boundary.extend_from_slice(URL_SAFE_NO_PAD.encode(entropy).as_bytes());
    boundary.extend_from_slice(b"=-");
    boundary
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)]
mod tests {
    use super::*;

    fn encoded(name: &str, value: &str) -> String {
        String::from_utf8(encode_param(name, value)).unwrap()
    }

    #[test]
    fn plain_ascii_params_are_quoted_verbatim() {
        assert_eq!(encoded("name", "file"), "name=\"file\"");
        assert_eq!(encoded("filename", "a b.bin"), "filename=\"a b.bin\"");
        assert_eq!(encoded("charset", "utf-8"), "charset=\"utf-8\"");
        // empty values are still directly representable
        assert_eq!(encoded("label", ""), "label=\"\"");
    }

    #[test]
    fn unsafe_and_non_ascii_params_use_extended_form() {
        assert_eq!(
            encoded("filename", "h\u{e9}llo.txt"),
            "filename*=utf-8''h%C3%A9llo.txt"
        );
        assert_eq!(encoded("name", "a\"b"), "name*=utf-8''a%22b");
        assert_eq!(encoded("name", "a\\b"), "name*=utf-8''a%5Cb");
        assert_eq!(encoded("name", "a\r\nb"), "name*=utf-8''a%0D%0Ab");
    }

    #[test]
    fn extended_form_round_trips_through_percent_decoding() {
        for value in ["h\u{e9}llo.txt", "sm\u{f6}rg\u{e5}sbord \"x\"", "\u{1f47e}.bin", "a\\\r\nb"] {
            let rendered = encoded("filename", value);
            let tail = rendered.strip_prefix("filename*=utf-8''").unwrap();
            let decoded = urlencoding::decode_binary(tail.as_bytes());
            assert_eq!(std::str::from_utf8(&decoded).unwrap(), value);
        }
    }

    #[test]
    fn boundary_never_occurs_in_any_part() {
        let mut body = FormBody::new();
        body.add_text("tag", "v1.0");
        body.add_file("file", vec![0, 1, 2, 13, 10, 45, 61], Some("x.bin"), None);
        let boundary = body.boundary();
        for part in &body.parts {
            assert!(!part.contains(&boundary));
        }
    }

    #[test]
    fn boundary_is_stable_and_well_formed() {
        let mut body = FormBody::new();
        body.add_text("a", "b");
        let first = body.boundary();
        // no mutation, so the cached boundary must be returned
        assert_eq!(first, body.boundary());
        assert!(first.starts_with(b"-="));
        assert!(first.ends_with(b"=-"));
        // 2 + 32 base64 chars + 2, within the RFC 2046 70-char limit
        assert_eq!(first.len(), 36);
    }

    #[test]
    fn render_is_idempotent() {
        let mut body = FormBody::new();
        body.add_text("name", "v1.0");
        body.add_file("file", b"\x00\x01binary".to_vec(), Some("a b.bin"), None);
        assert_eq!(body.render(), body.render());
    }

    #[test]
    fn rendered_body_matches_wire_format() {
        let mut body = FormBody::new();
        body.add_text("name", "v1.0");
        body.add_file(
            "file",
            b"\x00\x01binary".to_vec(),
            Some("a b.bin"),
            Some("application/octet-stream"),
        );

        let boundary = body.boundary();
        let rendered = body.render();
        let sections = parse_multipart(&rendered, &boundary);
        assert_eq!(sections.len(), 2);

        let (headers, payload) = &sections[0];
        assert_eq!(headers[0], "Content-Disposition: form-data; name=\"name\"");
        assert_eq!(headers[1], "Content-Type: text/plain; charset=\"utf-8\"");
        assert_eq!(headers[2], "Content-Transfer-Encoding: 8bit");
        assert_eq!(payload.as_slice(), b"v1.0");

        let (headers, payload) = &sections[1];
        assert_eq!(
            headers[0],
            "Content-Disposition: form-data; name=\"file\"; filename=\"a b.bin\""
        );
        assert_eq!(headers[1], "Content-Type: application/octet-stream");
        assert_eq!(headers[2], "Content-Transfer-Encoding: binary");
        assert_eq!(payload.as_slice(), b"\x00\x01binary");

        let mut terminator = b"--".to_vec();
        terminator.extend_from_slice(&boundary);
        terminator.extend_from_slice(b"--\r\n");
        assert!(rendered.ends_with(&terminator));
    }

    #[test]
    fn content_type_quotes_the_boundary() {
        let mut body = FormBody::new();
        body.add_text("a", "b");
        let boundary = String::from_utf8(body.boundary()).unwrap();
        assert_eq!(
            body.content_type(),
            format!("multipart/form-data; boundary=\"{boundary}\"")
        );
    }

    #[test]
    fn non_ascii_filename_uses_extended_parameter() {
        let mut body = FormBody::new();
        body.add_file("file", b"data".to_vec(), Some("h\u{e9}llo.txt"), None);
        let rendered = body.render();
        let text = String::from_utf8_lossy(&rendered);
        assert!(text.contains("filename*=utf-8''h%C3%A9llo.txt"));
        assert!(!text.contains("filename=\"h"));
    }

    #[test]
    fn appending_a_colliding_part_regenerates_the_boundary() {
        let mut body = FormBody::new();
        body.add_text("first", "payload");
        let stale = body.boundary();

        // craft a payload that embeds the already-chosen boundary
        let mut payload = b"prefix".to_vec();
        payload.extend_from_slice(&stale);
        payload.extend_from_slice(b"suffix");
        body.add_file("file", payload, Some("evil.bin"), None);

        let fresh = body.boundary();
        assert_ne!(stale, fresh);
        for part in &body.parts {
            assert!(!part.contains(&fresh));
        }
        // the rendered body delimits on the fresh boundary only
        let rendered = body.render();
        let sections = parse_multipart(&rendered, &fresh);
        assert_eq!(sections.len(), 2);
        assert!(sections[1].1.windows(stale.len()).any(|w| w == stale));
    }

    #[test]
    fn empty_payloads_render_as_empty_sections() {
        let mut body = FormBody::new();
        body.add_file("file", Vec::new(), None, None);
        let boundary = body.boundary();
        let sections = parse_multipart(&body.render(), &boundary);
        assert_eq!(sections.len(), 1);
        assert!(sections[0].1.is_empty());
    }

    /// Minimal strict multipart parse: split on the delimiter lines, then
    /// split each section into header lines and payload at the blank line.
    fn parse_multipart(body: &[u8], boundary: &[u8]) -> Vec<(Vec<String>, Vec<u8>)> {
        let mut delimiter = b"--".to_vec();
        delimiter.extend_from_slice(boundary);

        let mut open = delimiter.clone();
        open.extend_from_slice(b"\r\n");
        let mut close = b"\r\n".to_vec();
        close.extend_from_slice(&delimiter);
        close.extend_from_slice(b"--\r\n");

        assert!(body.starts_with(&open));
        assert!(body.ends_with(&close));
        let inner = &body[open.len()..body.len() - close.len()];

        let mut separator = b"\r\n".to_vec();
        separator.extend_from_slice(&open);

        let mut sections = Vec::new();
        let mut rest = inner;
        loop {
            let split = rest
                .windows(separator.len())
                .position(|window| window == separator);
            let (section, remainder) = match split {
                Some(at) => (&rest[..at], &rest[at + separator.len()..]),
                None => (rest, &[][..]),
            };
            let blank = section
                .windows(4)
                .position(|window| window == b"\r\n\r\n")
                .unwrap();
            let headers = std::str::from_utf8(&section[..blank])
                .unwrap()
                .split("\r\n")
                .map(str::to_owned)
                .collect();
            sections.push((headers, section[blank + 4..].to_vec()));
            if remainder.is_empty() {
                break;
            }
            rest = remainder;
        }
        sections
    }
}
