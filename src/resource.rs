//! ResourceArc Wrappers
//!
//! Persistent state handed to the BEAM: mutable filters being configured,
//! and immutable encoders built from them.

use crate::encoder::HtmlEncoder;
use crate::filter::CodePointFilter;
use rustler::ResourceArc;
use std::sync::{Arc, Mutex};

/// Wrapper for CodePointFilter that can be stored in a ResourceArc
pub struct FilterResource {
    pub inner: Mutex<CodePointFilter>,
}

impl FilterResource {
    pub fn new(filter: CodePointFilter) -> Self {
        FilterResource {
            inner: Mutex::new(filter),
        }
    }

    /// Run `f` against the filter.
    ///
    /// # Errors
    ///
    /// Returns `"mutex_poisoned"` if the filter mutex is poisoned.
    pub fn with_filter<F, R>(&self, f: F) -> Result<R, &'static str>
    where
        F: FnOnce(&mut CodePointFilter) -> R,
    {
        let mut guard = self.inner.lock().map_err(|_| "mutex_poisoned")?;
        Ok(f(&mut guard))
    }

    /// Copy of the filter's current state
    pub fn snapshot(&self) -> Result<CodePointFilter, &'static str> {
        self.with_filter(|filter| filter.clone())
    }
}

#[rustler::resource_impl]
impl rustler::Resource for FilterResource {}

impl Default for FilterResource {
    fn default() -> Self {
        Self::new(CodePointFilter::new())
    }
}

/// Type alias for filter ResourceArc
pub type FilterRef = ResourceArc<FilterResource>;

/// Wrapper for a built encoder. Encoders never change, so no lock is needed.
pub struct EncoderResource {
    pub encoder: Arc<HtmlEncoder>,
}

impl EncoderResource {
    pub fn new(encoder: HtmlEncoder) -> Self {
        EncoderResource {
            encoder: Arc::new(encoder),
        }
    }

    /// Share an encoder that is also held elsewhere (e.g. the encoder cache)
    pub fn shared(encoder: Arc<HtmlEncoder>) -> Self {
        EncoderResource { encoder }
    }
}

#[rustler::resource_impl]
impl rustler::Resource for EncoderResource {}

/// Type alias for encoder ResourceArc
pub type EncoderRef = ResourceArc<EncoderResource>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_with_filter_mutates() {
        let resource = FilterResource::default();
        resource
            .with_filter(|filter| {
                filter.forbid_char('x');
            })
            .unwrap();
        let snapshot = resource.snapshot().unwrap();
        assert!(!snapshot.is_code_point_allowed('x' as u32));
        assert!(snapshot.is_code_point_allowed('y' as u32));
    }

    #[test]
    fn test_snapshot_is_detached() {
        let resource = FilterResource::new(CodePointFilter::empty());
        let before = resource.snapshot().unwrap();
        resource.with_filter(|filter| filter.allow_char('a').is_code_point_allowed('a' as u32)).unwrap();
        assert!(!before.is_code_point_allowed('a' as u32));
        assert!(resource.snapshot().unwrap().is_code_point_allowed('a' as u32));
    }

    fn assert_registered_resource<T: rustler::Resource>() {}

    #[test]
    fn test_resources_have_single_registration() {
        // `resource_impl` is the only registration; `init!` takes no load hook
        assert_registered_resource::<FilterResource>();
        assert_registered_resource::<EncoderResource>();
    }

    #[test]
    fn test_encoder_resource_shares() {
        let encoder = Arc::new(HtmlEncoder::new());
        let resource = EncoderResource::shared(Arc::clone(&encoder));
        assert!(Arc::ptr_eq(&resource.encoder, &encoder));
        assert_eq!(EncoderResource::new(HtmlEncoder::new()).encoder.encode_str("<"), "&lt;");
    }
}
