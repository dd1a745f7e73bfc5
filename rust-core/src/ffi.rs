//! C ABI entry points for wasm and native hosts
//!
//! Each export reports success as `bool`. Engine state lives in a per-thread
//! context: a host that calls in from several threads gets one independent
//! FFT engine and kernel bank per thread.
//!
//! Buffers are host-owned. Every pointer must be valid for the stated number of
//! `f32` elements for the duration of the call, and the buffers passed to one
//! call must not overlap.

#![allow(non_snake_case)]

use crate::cqt::{CqtConfig, CqtEngine};
use crate::error::{Result, TransformError};
use crate::spectrum::FftEngine;
use std::cell::RefCell;

#[derive(Default)]
struct HostContext {
    fft: Option<FftEngine>,
    cqt: Option<CqtEngine>,
}

thread_local! {
    static CONTEXT: RefCell<HostContext> = RefCell::new(HostContext::default());
}

/// Build FFT tables for length `n`
///
/// Replaces any existing engine. Fails if `n` is not a positive power of two,
/// in which case the current engine is kept.
#[no_mangle]
pub extern "C" fn initFFT(n: i32) -> bool {
    report("initFFT", init_fft(n))
}

/// Forward transform of two length-`n` buffers in place
///
/// # Safety
/// `real` and `imag` must each point to `n` writable, non-overlapping `f32`s.
#[no_mangle]
pub unsafe extern "C" fn fft(real: *mut f32, imag: *mut f32, n: i32) -> bool {
    report("fft", transform(real, imag, n, FftEngine::forward))
}

/// Inverse transform of two length-`n` buffers in place, scaled by 1/n
///
/// # Safety
/// Same contract as [`fft`].
#[no_mangle]
pub unsafe extern "C" fn ifft(real: *mut f32, imag: *mut f32, n: i32) -> bool {
    report("ifft", transform(real, imag, n, FftEngine::inverse))
}

/// Build the CQT kernel bank using the FFT engine initialized for `n`
#[no_mangle]
pub extern "C" fn initCQT(
    bins_per_octave: i32,
    octaves: i32,
    n: i32,
    sample_rate: f32,
    min_freq: f32,
) -> bool {
    report(
        "initCQT",
        init_cqt(bins_per_octave, octaves, n, sample_rate, min_freq),
    )
}

/// Apply the kernel bank to a length-`n` spectrum
///
/// # Safety
/// `input_real`/`input_imag` must point to `n` readable `f32`s and
/// `output_real`/`output_imag` to `bins_per_octave * octaves` writable `f32`s.
#[no_mangle]
pub unsafe extern "C" fn cqt(
    input_real: *mut f32,
    input_imag: *mut f32,
    output_real: *mut f32,
    output_imag: *mut f32,
    n: i32,
    bins_per_octave: i32,
    octaves: i32,
) -> bool {
    report(
        "cqt",
        apply_cqt(
            [input_real, input_imag, output_real, output_imag],
            n,
            bins_per_octave,
            octaves,
        ),
    )
}

/// Release the FFT tables. Always succeeds.
#[no_mangle]
pub extern "C" fn freeFFT() -> bool {
    CONTEXT.with(|ctx| ctx.borrow_mut().fft = None);
    true
}

/// Release the kernel bank. Always succeeds.
#[no_mangle]
pub extern "C" fn freeCQT() -> bool {
    CONTEXT.with(|ctx| ctx.borrow_mut().cqt = None);
    true
}

fn report(op: &str, result: Result<()>) -> bool {
    match result {
        Ok(()) => true,
        Err(err) => {
            log::debug!("{} rejected: {}", op, err);
            false
        }
    }
}

fn positive(name: &'static str, value: i32) -> Result<usize> {
    match usize::try_from(value) {
        Ok(v) if v > 0 => Ok(v),
        _ => Err(TransformError::InvalidParameter {
            name,
            value: value as f64,
        }),
    }
}

fn power_of_two(n: i32) -> Result<usize> {
    let n = positive("n", n)?;
    if !n.is_power_of_two() {
        return Err(TransformError::InvalidLength(n));
    }
    Ok(n)
}

fn check_non_null(ptrs: &[*mut f32]) -> Result<()> {
    if ptrs.iter().any(|p| p.is_null()) {
        return Err(TransformError::NullBuffer);
    }
    Ok(())
}

fn init_fft(n: i32) -> Result<()> {
    let engine = FftEngine::new(power_of_two(n)?)?;
    CONTEXT.with(|ctx| ctx.borrow_mut().fft = Some(engine));
    Ok(())
}

unsafe fn transform(
    real: *mut f32,
    imag: *mut f32,
    n: i32,
    op: fn(&FftEngine, &mut [f32], &mut [f32]) -> Result<()>,
) -> Result<()> {
    let n = power_of_two(n)?;
    check_non_null(&[real, imag])?;

    CONTEXT.with(|ctx| {
        let ctx = ctx.borrow();
        let engine = ctx.fft.as_ref().ok_or(TransformError::Uninitialized)?;
        if engine.fft_size() != n {
            return Err(TransformError::LengthMismatch {
                expected: engine.fft_size(),
                found: n,
            });
        }

        let real = std::slice::from_raw_parts_mut(real, n);
        let imag = std::slice::from_raw_parts_mut(imag, n);
        op(engine, real, imag)
    })
}

fn init_cqt(
    bins_per_octave: i32,
    octaves: i32,
    n: i32,
    sample_rate: f32,
    min_freq: f32,
) -> Result<()> {
    let config = CqtConfig::new(
        positive("bins_per_octave", bins_per_octave)?,
        positive("octaves", octaves)?,
        power_of_two(n)?,
        sample_rate,
        min_freq,
    );
    config.validate()?;

    CONTEXT.with(|ctx| {
        let mut guard = ctx.borrow_mut();
        let ctx = &mut *guard;
        if ctx.cqt.is_some() {
            return Err(TransformError::AlreadyInitialized);
        }
        let fft = ctx.fft.as_ref().ok_or(TransformError::Uninitialized)?;
        ctx.cqt = Some(CqtEngine::new(&config, fft)?);
        Ok(())
    })
}

unsafe fn apply_cqt(
    buffers: [*mut f32; 4],
    n: i32,
    bins_per_octave: i32,
    octaves: i32,
) -> Result<()> {
    check_non_null(&buffers)?;
    let bins_per_octave = positive("bins_per_octave", bins_per_octave)?;
    let octaves = positive("octaves", octaves)?;
    let n = positive("n", n)?;

    CONTEXT.with(|ctx| {
        let ctx = ctx.borrow();
        let engine = ctx.cqt.as_ref().ok_or(TransformError::Uninitialized)?;

        let requested = bins_per_octave.saturating_mul(octaves);
        if requested > engine.total_bins() {
            return Err(TransformError::BankTooSmall {
                requested,
                available: engine.total_bins(),
            });
        }
        if n != engine.fft_size() {
            return Err(TransformError::LengthMismatch {
                expected: engine.fft_size(),
                found: n,
            });
        }

        let [in_re, in_im, out_re, out_im] = buffers;
        let in_re = std::slice::from_raw_parts(in_re as *const f32, n);
        let in_im = std::slice::from_raw_parts(in_im as *const f32, n);
        let out_re = std::slice::from_raw_parts_mut(out_re, requested);
        let out_im = std::slice::from_raw_parts_mut(out_im, requested);
        engine.apply(in_re, in_im, out_re, out_im, bins_per_octave, octaves)
    })
}
