//! RustyEncode - Contextual HTML encoding with Unicode allowance filters
//!
//! Surfaces:
//! A: Code point filters (filter_*)
//! B: Encoders built from filters or block names (encoder_*)
//! C: UTF-8, UTF-16 and batch encoding (html_encode*)
//! D: Unicode block catalog and defined-character lookup

use std::borrow::Cow;

use rustler::{Binary, Encoder, Env, NifResult, ResourceArc, Term};

mod core;
mod encoder;
mod filter;
mod resource;
mod strategy;
mod term;

use encoder::{CacheError, EncoderCache, HtmlEncoder};
use filter::{blocks, CodePointFilter, CodePointSource};
use resource::{EncoderRef, EncoderResource, FilterRef, FilterResource};
use term::{block_to_term, bytes_to_binary, error_detail, error_tuple, ok_tuple, resolve_blocks};

// ============================================================================
// Allocator Configuration
// ============================================================================

#[cfg(feature = "memory_tracking")]
mod tracking {
    use std::alloc::{GlobalAlloc, Layout};
    use std::sync::atomic::{AtomicUsize, Ordering};

    pub static ALLOCATED: AtomicUsize = AtomicUsize::new(0);
    pub static PEAK_ALLOCATED: AtomicUsize = AtomicUsize::new(0);

    pub struct TrackingAllocator;

    #[cfg(feature = "mimalloc")]
    static UNDERLYING: mimalloc::MiMalloc = mimalloc::MiMalloc;

    #[cfg(not(feature = "mimalloc"))]
    static UNDERLYING: std::alloc::System = std::alloc::System;

    unsafe impl GlobalAlloc for TrackingAllocator {
        unsafe fn alloc(&self, layout: Layout) -> *mut u8 {
            let ptr = UNDERLYING.alloc(layout);
            if !ptr.is_null() {
                let current = ALLOCATED.fetch_add(layout.size(), Ordering::Relaxed) + layout.size();
                let mut peak = PEAK_ALLOCATED.load(Ordering::Relaxed);
                while current > peak {
                    match PEAK_ALLOCATED.compare_exchange_weak(
                        peak,
                        current,
                        Ordering::Relaxed,
                        Ordering::Relaxed,
                    ) {
                        Ok(_) => break,
                        Err(p) => peak = p,
                    }
                }
            }
            ptr
        }

        unsafe fn dealloc(&self, ptr: *mut u8, layout: Layout) {
            ALLOCATED.fetch_sub(layout.size(), Ordering::Relaxed);
            UNDERLYING.dealloc(ptr, layout)
        }
    }
}

#[cfg(feature = "memory_tracking")]
#[global_allocator]
static GLOBAL: tracking::TrackingAllocator = tracking::TrackingAllocator;

#[cfg(all(feature = "mimalloc", not(feature = "memory_tracking")))]
#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

// ============================================================================
// Memory Tracking NIFs
// ============================================================================

#[cfg(feature = "memory_tracking")]
use std::sync::atomic::Ordering;

#[cfg(feature = "memory_tracking")]
#[rustler::nif]
fn get_rust_memory() -> usize {
    tracking::ALLOCATED.load(Ordering::SeqCst)
}

#[cfg(feature = "memory_tracking")]
#[rustler::nif]
fn get_rust_memory_peak() -> usize {
    tracking::PEAK_ALLOCATED.load(Ordering::SeqCst)
}

#[cfg(feature = "memory_tracking")]
#[rustler::nif]
fn reset_rust_memory_stats() -> (usize, usize) {
    let current = tracking::ALLOCATED.load(Ordering::SeqCst);
    let peak = tracking::PEAK_ALLOCATED.swap(current, Ordering::SeqCst);
    (current, peak)
}

#[cfg(not(feature = "memory_tracking"))]
#[rustler::nif]
fn get_rust_memory() -> usize {
    0
}

#[cfg(not(feature = "memory_tracking"))]
#[rustler::nif]
fn get_rust_memory_peak() -> usize {
    0
}

#[cfg(not(feature = "memory_tracking"))]
#[rustler::nif]
fn reset_rust_memory_stats() -> (usize, usize) {
    (0, 0)
}

// ============================================================================
// A: Code Point Filters
// ============================================================================

/// New filter allowing BasicLatin
#[rustler::nif]
fn filter_new() -> FilterRef {
    ResourceArc::new(FilterResource::new(CodePointFilter::new()))
}

/// New filter allowing nothing
#[rustler::nif]
fn filter_empty() -> FilterRef {
    ResourceArc::new(FilterResource::new(CodePointFilter::empty()))
}

/// New filter allowing the named blocks
/// Returns {:ok, filter} or {:error, {:unknown_block, name}}
#[rustler::nif]
fn filter_from_blocks<'a>(env: Env<'a>, names: Vec<&str>) -> NifResult<Term<'a>> {
    match resolve_blocks(&names) {
        Ok(selected) => {
            let filter = CodePointFilter::with_blocks(&selected);
            Ok(ok_tuple(env, ResourceArc::new(FilterResource::new(filter))))
        }
        Err(name) => Ok(error_detail(env, term::unknown_block(), &name)),
    }
}

/// Independent copy of a filter
#[rustler::nif]
fn filter_clone<'a>(env: Env<'a>, filter: FilterRef) -> NifResult<Term<'a>> {
    match filter.snapshot() {
        Ok(copy) => Ok(ok_tuple(env, ResourceArc::new(FilterResource::new(copy)))),
        Err(_) => Ok(error_tuple(env, term::mutex_poisoned())),
    }
}

/// Apply `f` to the filter and return :ok
fn update_filter<'a, F>(env: Env<'a>, filter: &FilterRef, f: F) -> Term<'a>
where
    F: FnOnce(&mut CodePointFilter),
{
    match filter.with_filter(f) {
        Ok(()) => term::ok().encode(env),
        Err(_) => error_tuple(env, term::mutex_poisoned()),
    }
}

/// Allow every code point of the named blocks
/// Nothing is changed if any name is unknown
#[rustler::nif]
fn filter_allow_blocks<'a>(env: Env<'a>, filter: FilterRef, names: Vec<&str>) -> NifResult<Term<'a>> {
    match resolve_blocks(&names) {
        Ok(selected) => Ok(update_filter(env, &filter, |f| {
            f.allow_blocks(&selected);
        })),
        Err(name) => Ok(error_detail(env, term::unknown_block(), &name)),
    }
}

/// Forbid every code point of the named blocks
#[rustler::nif]
fn filter_forbid_blocks<'a>(env: Env<'a>, filter: FilterRef, names: Vec<&str>) -> NifResult<Term<'a>> {
    match resolve_blocks(&names) {
        Ok(selected) => Ok(update_filter(env, &filter, |f| {
            f.forbid_blocks(&selected);
        })),
        Err(name) => Ok(error_detail(env, term::unknown_block(), &name)),
    }
}

/// Allow each character of `chars`
#[rustler::nif]
fn filter_allow_chars<'a>(env: Env<'a>, filter: FilterRef, chars: &str) -> NifResult<Term<'a>> {
    Ok(update_filter(env, &filter, |f| {
        f.allow_chars(chars.chars());
    }))
}

/// Forbid each character of `chars`
#[rustler::nif]
fn filter_forbid_chars<'a>(env: Env<'a>, filter: FilterRef, chars: &str) -> NifResult<Term<'a>> {
    Ok(update_filter(env, &filter, |f| {
        f.forbid_chars(chars.chars());
    }))
}

/// Allow everything `other` allows
#[rustler::nif]
fn filter_allow_filter<'a>(env: Env<'a>, filter: FilterRef, other: FilterRef) -> NifResult<Term<'a>> {
    // Snapshot first: `other` may be the same resource as `filter`
    let source = match other.snapshot() {
        Ok(source) => source,
        Err(_) => return Ok(error_tuple(env, term::mutex_poisoned())),
    };
    Ok(update_filter(env, &filter, |f| {
        f.allow_filter(&source);
    }))
}

/// Allowed code points, ascending
#[rustler::nif]
fn filter_allowed_code_points<'a>(env: Env<'a>, filter: FilterRef) -> NifResult<Term<'a>> {
    match filter.with_filter(|f| f.allowed_code_points().collect::<Vec<u32>>()) {
        Ok(code_points) => Ok(ok_tuple(env, code_points)),
        Err(_) => Ok(error_tuple(env, term::mutex_poisoned())),
    }
}

/// Whether the filter allows a code point
#[rustler::nif]
fn filter_is_allowed<'a>(env: Env<'a>, filter: FilterRef, code_point: u32) -> NifResult<Term<'a>> {
    match filter.with_filter(|f| f.is_code_point_allowed(code_point)) {
        Ok(allowed) => Ok(allowed.encode(env)),
        Err(_) => Ok(error_tuple(env, term::mutex_poisoned())),
    }
}

// ============================================================================
// B: Encoders
// ============================================================================

/// Encoder allowing the union of the given filters
/// An empty list allows nothing
#[rustler::nif]
fn encoder_new<'a>(env: Env<'a>, filters: Vec<FilterRef>) -> NifResult<Term<'a>> {
    let mut snapshots = Vec::with_capacity(filters.len());
    for filter in &filters {
        match filter.snapshot() {
            Ok(snapshot) => snapshots.push(snapshot),
            Err(_) => return Ok(error_tuple(env, term::mutex_poisoned())),
        }
    }
    let sources: Vec<&dyn CodePointSource> = snapshots
        .iter()
        .map(|f| f as &dyn CodePointSource)
        .collect();

    let encoder = HtmlEncoder::from_sources(&sources);
    Ok(ok_tuple(env, ResourceArc::new(EncoderResource::new(encoder))))
}

/// Encoder allowing the named blocks, shared through the encoder cache
#[rustler::nif]
fn encoder_for_blocks<'a>(env: Env<'a>, names: Vec<&str>) -> NifResult<Term<'a>> {
    match EncoderCache::global().get_or_build(&names) {
        Ok(encoder) => Ok(ok_tuple(env, ResourceArc::new(EncoderResource::shared(encoder)))),
        Err(CacheError::UnknownBlock(name)) => Ok(error_detail(env, term::unknown_block(), &name)),
        Err(CacheError::Poisoned) => Ok(error_tuple(env, term::mutex_poisoned())),
    }
}

// ============================================================================
// C: Encoding
// ============================================================================

/// Encode a UTF-8 binary or nil. Invalid sequences become U+FFFD.
/// Returns the input binary itself when nothing needs escaping.
fn encode_binary<'a>(env: Env<'a>, encoder: &HtmlEncoder, input: Option<Binary<'a>>) -> Term<'a> {
    let bytes = input.as_ref().map(|binary| binary.as_slice());
    match (encoder.encode_lossy(bytes), &input) {
        (Some(Cow::Borrowed(_)), Some(binary)) => binary.to_term(env),
        (Some(encoded), _) => bytes_to_binary(env, encoded.as_bytes()),
        (None, _) => rustler::types::atom::nil().encode(env),
    }
}

/// Encode with the given encoder; nil passes through
#[rustler::nif]
fn html_encode<'a>(env: Env<'a>, encoder: EncoderRef, input: Option<Binary<'a>>) -> NifResult<Term<'a>> {
    Ok(encode_binary(env, &encoder.encoder, input))
}

/// Encode with the shared BasicLatin encoder; nil passes through
#[rustler::nif]
fn html_encode_default<'a>(env: Env<'a>, input: Option<Binary<'a>>) -> NifResult<Term<'a>> {
    Ok(encode_binary(env, HtmlEncoder::default_instance(), input))
}

/// Encode a UTF-16 binary (BOM optional, little endian without one)
/// Returns {:ok, binary} in the input's byte order, without a BOM
#[rustler::nif]
fn html_encode_utf16<'a>(env: Env<'a>, encoder: EncoderRef, input: Binary<'a>) -> NifResult<Term<'a>> {
    match core::encoding::units_from_bytes(input.as_slice()) {
        Ok((units, order)) => {
            let encoded = encoder.encoder.encode_utf16(&units);
            let bytes = core::encoding::units_to_bytes(&encoded, order);
            Ok(ok_tuple(env, bytes_to_binary(env, &bytes)))
        }
        Err(msg) => Ok(error_detail(env, term::invalid_utf16(), &msg)),
    }
}

/// Encode many binaries in parallel, preserving order; nil elements stay nil
#[rustler::nif(schedule = "DirtyCpu")]
fn html_encode_batch<'a>(
    env: Env<'a>,
    encoder: EncoderRef,
    inputs: Vec<Option<Binary<'a>>>,
) -> NifResult<Term<'a>> {
    let slices: Vec<Option<&[u8]>> = inputs
        .iter()
        .map(|input| input.as_ref().map(|binary| binary.as_slice()))
        .collect();

    let results = strategy::parallel::encode_parallel(&encoder.encoder, &slices);

    let mut list = Term::list_new_empty(env);
    for result in results.into_iter().rev() {
        let term = match result {
            Some(encoded) => bytes_to_binary(env, encoded.as_bytes()),
            None => rustler::types::atom::nil().encode(env),
        };
        list = list.list_prepend(term);
    }
    Ok(list)
}

// ============================================================================
// D: Unicode Data
// ============================================================================

/// Look up a block by name
/// Returns {:ok, {name, first_code_point, size}} or {:error, :unknown_block}
#[rustler::nif]
fn unicode_block<'a>(env: Env<'a>, name: &str) -> NifResult<Term<'a>> {
    match blocks::lookup(name) {
        Some((canonical, block)) => Ok(ok_tuple(env, block_to_term(env, canonical, block))),
        None => Ok(error_tuple(env, term::unknown_block())),
    }
}

/// Names of all catalog blocks in code point order
#[rustler::nif]
fn unicode_block_names<'a>(env: Env<'a>) -> NifResult<Term<'a>> {
    Ok(term::block_names_to_term(env))
}

/// Whether a code point is assigned in the embedded Unicode data
/// Always false above U+FFFF
#[rustler::nif]
fn is_character_defined(code_point: u32) -> bool {
    u16::try_from(code_point).is_ok_and(crate::core::unicode::is_character_defined)
}

// ============================================================================
// NIF Initialization
// ============================================================================

// Resources register themselves through `#[rustler::resource_impl]`
rustler::init!("Elixir.RustyEncode.Native");
