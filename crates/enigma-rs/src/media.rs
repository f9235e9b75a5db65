//! Image blob normalization for multimodal request parts.
//!
//! Browsers hand over images as data URIs (`data:image/png;base64,AAAA...`);
//! the model endpoint wants the bare base64 payload plus a media-type label.
//! [`normalize`] strips a recognized data-URI header if present and returns
//! the payload alongside the declared type.

/// Media type declared for every normalized image, whatever the input kind
/// was. The upstream payload always labels images as JPEG — PNG and WebP
/// inputs keep their bytes but not their label.
//
// TODO: forward the detected input kind instead of the fixed label. The
// current behavior matches the deployed service and changing it alters the
// wire payload, so it needs a coordinated rollout.
pub const CANONICAL_MIME_TYPE: &str = "image/jpeg";

/// Data-URI headers this module recognizes and strips.
const DATA_URI_PREFIXES: [&str; 4] = [
    "data:image/png;base64,",
    "data:image/jpeg;base64,",
    "data:image/jpg;base64,",
    "data:image/webp;base64,",
];

/// Strip a recognized data-URI header from `blob` and return
/// `(mime_type, payload)`.
///
/// Normalization is best-effort, not validating: an unrecognized prefix (or
/// no prefix at all) passes through unchanged as an already-bare payload.
/// Never fails.
pub fn normalize(blob: &str) -> (&'static str, &str) {
    for prefix in DATA_URI_PREFIXES {
        if let Some(payload) = blob.strip_prefix(prefix) {
            return (CANONICAL_MIME_TYPE, payload);
        }
    }
    (CANONICAL_MIME_TYPE, blob)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_png_header_and_labels_jpeg() {
        let (mime, payload) = normalize("data:image/png;base64,AAAA");
        assert_eq!(payload, "AAAA");
        assert_eq!(mime, "image/jpeg");
    }

    #[test]
    fn strips_all_recognized_kinds() {
        for kind in ["png", "jpeg", "jpg", "webp"] {
            let blob = format!("data:image/{kind};base64,Zm9v");
            let (mime, payload) = normalize(&blob);
            assert_eq!(payload, "Zm9v", "kind {kind}");
            assert_eq!(mime, CANONICAL_MIME_TYPE, "kind {kind}");
        }
    }

    #[test]
    fn bare_payload_passes_through() {
        let (mime, payload) = normalize("AAAA");
        assert_eq!(payload, "AAAA");
        assert_eq!(mime, "image/jpeg");
    }

    #[test]
    fn unrecognized_prefix_passes_through_unchanged() {
        let blob = "data:image/gif;base64,R0lGOD";
        let (_, payload) = normalize(blob);
        assert_eq!(payload, blob);
    }
}
