//! Debug-report diagnostics channel
//!
//! In debug configuration a `VK_EXT_debug_report` callback is registered on
//! the instance and every error or warning the validation layer raises is
//! forwarded to the `log` facade.

use ash::vk;
use std::ffi::CStr;
use std::os::raw::{c_char, c_void};

use crate::vulkan::error::VulkanResult;
use crate::vulkan::runtime::Runtime;

/// Report kinds the callback is registered for
pub fn report_flags() -> vk::DebugReportFlagsEXT {
    vk::DebugReportFlagsEXT::ERROR
        | vk::DebugReportFlagsEXT::WARNING
        | vk::DebugReportFlagsEXT::PERFORMANCE_WARNING
}

/// Log level a report with `flags` is forwarded at
pub fn report_level(flags: vk::DebugReportFlagsEXT) -> log::Level {
    if flags.contains(vk::DebugReportFlagsEXT::ERROR) {
        log::Level::Error
    } else if flags.intersects(vk::DebugReportFlagsEXT::WARNING | vk::DebugReportFlagsEXT::PERFORMANCE_WARNING) {
        log::Level::Warn
    } else {
        log::Level::Debug
    }
}

/// Attach the diagnostics sink when `enabled`
pub fn attach<R: Runtime>(runtime: &R, instance: &R::Instance, enabled: bool) -> VulkanResult<Option<R::Diagnostics>> {
    if !enabled {
        return Ok(None);
    }

    log::info!("Creating Vulkan debug report callback");
    runtime.create_diagnostics(instance).map(Some)
}

fn lossy(ptr: *const c_char) -> String {
    if ptr.is_null() {
        String::new()
    } else {
        // SAFETY: the loader passes NUL-terminated strings valid for the call
        unsafe { CStr::from_ptr(ptr) }.to_string_lossy().into_owned()
    }
}

/// Callback handed to `vkCreateDebugReportCallbackEXT`
///
/// Runs on whatever thread triggered the report. It only formats one line and
/// never unwinds into the driver; the triggering call is never aborted.
pub unsafe extern "system" fn debug_report_callback(
    flags: vk::DebugReportFlagsEXT,
    object_type: vk::DebugReportObjectTypeEXT,
    _object: u64,
    _location: usize,
    message_code: i32,
    p_layer_prefix: *const c_char,
    p_message: *const c_char,
    _user_data: *mut c_void,
) -> vk::Bool32 {
    let _ = std::panic::catch_unwind(|| {
        let prefix = lossy(p_layer_prefix);
        let message = lossy(p_message);
        log::log!(
            report_level(flags),
            "Vulkan debug callback: [{}] {:?} ({}) {}",
            prefix,
            object_type,
            message_code,
            message
        );
    });

    vk::FALSE
}
