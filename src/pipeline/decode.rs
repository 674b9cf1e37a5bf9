//! Decoder registry: file extension → text decoder.
//!
//! The core never understands file formats itself. Collaborators
//! register one decoder per extension (compound-binary, zip/XML, PDF);
//! only plain text ships in-crate. A file whose extension has no
//! registered decoder is simply not picked up.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use super::DecodeError;

/// Turns one source file into raw text. Implementations live with the
/// format collaborators; the core only calls through this seam.
pub trait TextDecoder: Send + Sync {
    fn decode(&self, path: &Path) -> Result<String, DecodeError>;
}

/// Plain-text passthrough for `.txt` / `.md` files.
pub struct PlainTextDecoder;

impl TextDecoder for PlainTextDecoder {
    fn decode(&self, path: &Path) -> Result<String, DecodeError> {
        Ok(std::fs::read_to_string(path)?)
    }
}

/// Extension → decoder lookup table. Resolution is by lookup, never by
/// inheritance; registering an extension twice replaces the decoder.
pub struct DecoderRegistry {
    decoders: HashMap<String, Arc<dyn TextDecoder>>,
}

impl DecoderRegistry {
    /// Empty registry — no extensions supported.
    pub fn new() -> Self {
        Self {
            decoders: HashMap::new(),
        }
    }

    /// Registry with the in-crate plain-text decoder on `.txt` / `.md`.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        let plain = Arc::new(PlainTextDecoder);
        registry.register("txt", plain.clone());
        registry.register("md", plain);
        registry
    }

    pub fn register(&mut self, extension: &str, decoder: Arc<dyn TextDecoder>) {
        self.decoders
            .insert(extension.to_ascii_lowercase(), decoder);
    }

    pub fn supports(&self, extension: &str) -> bool {
        self.decoders.contains_key(&extension.to_ascii_lowercase())
    }

    /// Extensions with a registered decoder, sorted for determinism.
    pub fn supported_extensions(&self) -> Vec<String> {
        let mut exts: Vec<String> = self.decoders.keys().cloned().collect();
        exts.sort();
        exts
    }

    /// Decode one file by extension lookup.
    pub fn decode(&self, path: &Path) -> Result<String, DecodeError> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .ok_or_else(|| DecodeError::MissingExtension(path.to_path_buf()))?
            .to_ascii_lowercase();

        let decoder = self
            .decoders
            .get(&extension)
            .ok_or(DecodeError::UnsupportedExtension(extension))?;

        decoder.decode(path)
    }
}

impl Default for DecoderRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedDecoder(&'static str);

    impl TextDecoder for FixedDecoder {
        fn decode(&self, _path: &Path) -> Result<String, DecodeError> {
            Ok(self.0.to_string())
        }
    }

    struct FailingDecoder;

    impl TextDecoder for FailingDecoder {
        fn decode(&self, path: &Path) -> Result<String, DecodeError> {
            Err(DecodeError::Malformed {
                filename: path
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_default(),
                reason: "truncated section stream".into(),
            })
        }
    }

    #[test]
    fn plain_text_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("memo.txt");
        std::fs::write(&path, "예산: 50,000,000원").unwrap();

        let registry = DecoderRegistry::with_defaults();
        assert_eq!(registry.decode(&path).unwrap(), "예산: 50,000,000원");
    }

    #[test]
    fn unknown_extension_is_rejected() {
        let registry = DecoderRegistry::with_defaults();
        let err = registry.decode(Path::new("a/report.hwp")).unwrap_err();
        assert!(matches!(err, DecodeError::UnsupportedExtension(ext) if ext == "hwp"));
    }

    #[test]
    fn missing_extension_is_rejected() {
        let registry = DecoderRegistry::with_defaults();
        let err = registry.decode(Path::new("a/README")).unwrap_err();
        assert!(matches!(err, DecodeError::MissingExtension(_)));
    }

    #[test]
    fn registered_decoder_wins_over_case() {
        let mut registry = DecoderRegistry::new();
        registry.register("HWP", Arc::new(FixedDecoder("본문")));
        assert!(registry.supports("hwp"));
        assert_eq!(registry.decode(Path::new("01_기안.HWP")).unwrap(), "본문");
    }

    #[test]
    fn decoder_failure_surfaces_as_error() {
        let mut registry = DecoderRegistry::new();
        registry.register("hwp", Arc::new(FailingDecoder));
        let err = registry.decode(Path::new("02_계약서.hwp")).unwrap_err();
        assert!(matches!(err, DecodeError::Malformed { .. }));
    }

    #[test]
    fn defaults_cover_txt_and_md() {
        let registry = DecoderRegistry::with_defaults();
        assert_eq!(registry.supported_extensions(), vec!["md", "txt"]);
    }
}
