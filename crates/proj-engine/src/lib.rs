//! PROJ-backed implementation of the transformation engine.
//!
//! This is the only crate that talks to the PROJ C library. Everything else
//! sees the [`pipeline::TransformEngine`] trait; the unsafe FFI stays
//! contained here.
//!
//! PROJ objects (`PJ`, `PJ_CONTEXT`) are not thread-safe, so every built
//! stage owns a private context and guards its handle with a mutex.

use std::ffi::{CStr, CString};
use std::os::raw::{c_char, c_int};
use std::path::PathBuf;
use std::ptr;
use std::sync::Mutex;

use catalog::CrsMetadata;
use crs_common::{AreaOfInterest, Coord, CrsId};
use pipeline::{EngineError, Stage, TransformEngine};
use proj_sys::{
    proj_area_create, proj_area_destroy, proj_area_set_bbox, proj_context_create,
    proj_context_destroy, proj_context_errno, proj_context_set_search_paths, proj_create,
    proj_create_crs_to_crs, proj_crs_get_coordinate_system, proj_crs_get_sub_crs,
    proj_cs_get_axis_count, proj_cs_get_axis_info, proj_destroy, proj_errno_string,
    proj_get_area_of_use, proj_get_type, proj_info, proj_trans, PJ_AREA, PJ_CONTEXT, PJ_COORD,
    PJ_DIRECTION_PJ_FWD, PJ_TYPE_PJ_TYPE_COMPOUND_CRS, PJ,
};

/// Engine over the PROJ library.
///
/// Extra search paths point PROJ at locally shipped resource files (init
/// files for the historical Danish systems); they are prepended to PROJ's
/// default search path in every context the engine creates.
#[derive(Debug, Default)]
pub struct ProjEngine {
    search_paths: Vec<PathBuf>,
}

impl ProjEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_search_paths(search_paths: Vec<PathBuf>) -> Self {
        Self { search_paths }
    }

    fn new_context(&self) -> Result<Context, EngineError> {
        Context::new(&self.search_paths)
    }
}

/// Owned PROJ context.
struct Context(*mut PJ_CONTEXT);

// Raw pointer only; the context is never shared between threads without the
// stage mutex.
unsafe impl Send for Context {}

impl Context {
    fn new(extra_paths: &[PathBuf]) -> Result<Self, EngineError> {
        let ctx = unsafe { proj_context_create() };
        if ctx.is_null() {
            return Err(EngineError::Fault("failed to create PROJ context".into()));
        }
        let context = Self(ctx);

        if !extra_paths.is_empty() {
            // Setting search paths replaces the defaults, so re-append them
            // after the extra directories.
            let mut paths: Vec<CString> = Vec::new();
            for path in extra_paths {
                paths.push(to_cstring(&path.display().to_string())?);
            }
            for path in default_search_paths() {
                paths.push(to_cstring(&path)?);
            }

            let ptrs: Vec<*const c_char> = paths.iter().map(|p| p.as_ptr()).collect();
            unsafe {
                proj_context_set_search_paths(context.0, ptrs.len() as c_int, ptrs.as_ptr());
            }
        }

        Ok(context)
    }

    fn error_message(&self) -> String {
        unsafe {
            let errno = proj_context_errno(self.0);
            cstr_to_string(proj_errno_string(errno))
                .unwrap_or_else(|| format!("PROJ error {}", errno))
        }
    }
}

impl Drop for Context {
    fn drop(&mut self) {
        unsafe { proj_context_destroy(self.0) };
    }
}

/// PROJ's built-in resource directories.
fn default_search_paths() -> Vec<String> {
    unsafe { cstr_to_string(proj_info().searchpath) }
        .map(|joined| {
            let separator = if cfg!(windows) { ';' } else { ':' };
            joined
                .split(separator)
                .filter(|p| !p.is_empty())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

fn to_cstring(s: &str) -> Result<CString, EngineError> {
    CString::new(s).map_err(|_| EngineError::Rejected(format!("embedded NUL in '{}'", s)))
}

unsafe fn cstr_to_string(ptr: *const c_char) -> Option<String> {
    if ptr.is_null() {
        None
    } else {
        Some(CStr::from_ptr(ptr).to_string_lossy().into_owned())
    }
}

/// A built PROJ transformation with its private context.
struct StageInner {
    pj: *mut PJ,
    // Kept alive for the lifetime of the PJ handle; dropped after it.
    _context: Context,
}

unsafe impl Send for StageInner {}

impl Drop for StageInner {
    fn drop(&mut self) {
        unsafe { proj_destroy(self.pj) };
    }
}

pub struct ProjStage {
    inner: Mutex<StageInner>,
}

impl ProjStage {
    fn new(context: Context, pj: *mut PJ) -> Self {
        Self {
            inner: Mutex::new(StageInner { pj, _context: context }),
        }
    }
}

impl Stage for ProjStage {
    fn apply(&self, coord: Coord) -> Result<Coord, EngineError> {
        let inner = self.inner.lock().expect("PROJ stage mutex poisoned");

        // Absent components: z defaults to 0, t to unset (HUGE_VAL, PROJ's
        // "no epoch" marker). Both are masked out of the result below, so
        // they never leak into the response.
        let input = PJ_COORD {
            v: [
                coord.v1,
                coord.v2,
                coord.v3.unwrap_or(0.0),
                coord.v4.unwrap_or(f64::INFINITY),
            ],
        };

        // Out-of-domain coordinates come back as infinities rather than an
        // error; classification happens at the pipeline level.
        let out = unsafe { proj_trans(inner.pj, PJ_DIRECTION_PJ_FWD, input) };
        let v = unsafe { out.v };

        Ok(Coord {
            v1: v[0],
            v2: v[1],
            v3: coord.v3.map(|_| v[2]),
            v4: coord.v4.map(|_| v[3]),
        })
    }
}

impl TransformEngine for ProjEngine {
    fn supports_authority(&self, authority: &str) -> bool {
        // PROJ resolves EPSG codes from its bundled database; everything
        // else is realized through hand-written pipeline expressions.
        authority == "EPSG"
    }

    fn build_crs_to_crs(
        &self,
        src: &CrsId,
        dst: &CrsId,
        area: Option<&AreaOfInterest>,
    ) -> Result<Box<dyn Stage>, EngineError> {
        let context = self.new_context()?;
        let src_c = to_cstring(src.as_str())?;
        let dst_c = to_cstring(dst.as_str())?;

        let pj = unsafe {
            let pj_area: *mut PJ_AREA = match area {
                Some(a) => {
                    let pj_area = proj_area_create();
                    proj_area_set_bbox(pj_area, a.west, a.south, a.east, a.north);
                    pj_area
                }
                None => ptr::null_mut(),
            };

            let pj = proj_create_crs_to_crs(context.0, src_c.as_ptr(), dst_c.as_ptr(), pj_area);
            if !pj_area.is_null() {
                proj_area_destroy(pj_area);
            }
            pj
        };

        if pj.is_null() {
            let message = context.error_message();
            tracing::debug!(src = %src, dst = %dst, "PROJ rejected CRS pair: {}", message);
            return Err(EngineError::Rejected(message));
        }

        Ok(Box::new(ProjStage::new(context, pj)))
    }

    fn build_pipeline(&self, definition: &str) -> Result<Box<dyn Stage>, EngineError> {
        let context = self.new_context()?;
        let definition_c = to_cstring(definition)?;

        let pj = unsafe { proj_create(context.0, definition_c.as_ptr()) };
        if pj.is_null() {
            let message = context.error_message();
            tracing::debug!(definition, "PROJ rejected pipeline: {}", message);
            return Err(EngineError::Rejected(message));
        }

        Ok(Box::new(ProjStage::new(context, pj)))
    }

    fn crs_metadata(&self, id: &CrsId) -> Result<CrsMetadata, EngineError> {
        let context = self.new_context()?;
        let id_c = to_cstring(id.as_str())?;

        unsafe {
            let crs = proj_create(context.0, id_c.as_ptr());
            if crs.is_null() {
                return Err(EngineError::Rejected(context.error_message()));
            }

            let metadata = describe_crs(&context, crs);
            proj_destroy(crs);

            metadata.ok_or_else(|| {
                EngineError::Rejected(format!("no area of use recorded for '{}'", id))
            })
        }
    }

    fn version(&self) -> String {
        unsafe { cstr_to_string(proj_info().version) }.unwrap_or_else(|| "unknown".to_string())
    }
}

/// Area of use and axis units for a CRS object.
///
/// A compound CRS carries the metadata of its components: the area of use is
/// taken from the sub-CRS with the smallest bounding box, and the axis list
/// is the concatenation of the sub-CRS axes.
unsafe fn describe_crs(context: &Context, crs: *mut PJ) -> Option<CrsMetadata> {
    let parts = sub_crs_list(context, crs);

    let (area_of_use, bounding_box) = if parts.is_empty() {
        area_of_use(context, crs)?
    } else {
        let mut best: Option<(String, [f64; 4])> = None;
        for part in &parts {
            if let Some((name, bbox)) = area_of_use(context, *part) {
                let extent = (bbox[2] - bbox[0]) * (bbox[3] - bbox[1]);
                let is_smaller = best
                    .as_ref()
                    .map(|(_, b)| extent < (b[2] - b[0]) * (b[3] - b[1]))
                    .unwrap_or(true);
                if is_smaller {
                    best = Some((name, bbox));
                }
            }
        }
        best?
    };

    let mut axis_units: [Option<String>; 4] = [None, None, None, None];
    let mut axis = 0;
    if parts.is_empty() {
        collect_axis_units(context, crs, &mut axis_units, &mut axis);
    } else {
        for part in &parts {
            collect_axis_units(context, *part, &mut axis_units, &mut axis);
        }
    }

    for part in parts {
        proj_destroy(part);
    }

    Some(CrsMetadata {
        area_of_use,
        bounding_box,
        axis_units,
    })
}

/// Sub-CRS handles of a compound CRS, empty for anything else. The caller
/// destroys the returned handles.
unsafe fn sub_crs_list(context: &Context, crs: *mut PJ) -> Vec<*mut PJ> {
    let mut parts = Vec::new();
    if proj_get_type(crs) == PJ_TYPE_PJ_TYPE_COMPOUND_CRS {
        let mut index = 0;
        loop {
            let part = proj_crs_get_sub_crs(context.0, crs, index);
            if part.is_null() {
                break;
            }
            parts.push(part);
            index += 1;
        }
    }
    parts
}

unsafe fn area_of_use(context: &Context, crs: *mut PJ) -> Option<(String, [f64; 4])> {
    let mut west = 0.0;
    let mut south = 0.0;
    let mut east = 0.0;
    let mut north = 0.0;
    let mut name: *const c_char = ptr::null();

    let ok = proj_get_area_of_use(
        context.0, crs, &mut west, &mut south, &mut east, &mut north, &mut name,
    );
    if ok == 0 {
        return None;
    }

    Some((
        cstr_to_string(name).unwrap_or_default(),
        [west, south, east, north],
    ))
}

unsafe fn collect_axis_units(
    context: &Context,
    crs: *mut PJ,
    units: &mut [Option<String>; 4],
    next_axis: &mut usize,
) {
    let cs = proj_crs_get_coordinate_system(context.0, crs);
    if cs.is_null() {
        return;
    }

    let count = proj_cs_get_axis_count(context.0, cs);
    for index in 0..count {
        if *next_axis >= units.len() {
            break;
        }

        let mut unit_name: *const c_char = ptr::null();
        let ok = proj_cs_get_axis_info(
            context.0,
            cs,
            index,
            ptr::null_mut(),
            ptr::null_mut(),
            ptr::null_mut(),
            ptr::null_mut(),
            &mut unit_name,
            ptr::null_mut(),
            ptr::null_mut(),
        );
        if ok != 0 {
            units[*next_axis] = cstr_to_string(unit_name);
            *next_axis += 1;
        }
    }

    proj_destroy(cs);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_send_sync<T: Send + Sync>() {}

    #[test]
    fn test_stage_and_engine_are_shareable() {
        assert_send_sync::<ProjEngine>();
        assert_send_sync::<ProjStage>();
    }

    #[test]
    fn test_supported_authorities() {
        let engine = ProjEngine::new();
        assert!(engine.supports_authority("EPSG"));
        assert!(!engine.supports_authority("DK"));
        assert!(!engine.supports_authority("GL"));
    }
}
