//! Crash context extraction.
//!
//! Turns the opaque host objects handed to a crash callback into a
//! [`CrashDescriptor`]. Every attribute is resolved independently through the
//! accessor tables in [`fields`]; anything that cannot be read falls back to
//! its default and extraction itself never fails.

pub mod fields;
pub mod strategy;

use crate::application::ports::HostHandle;
use crate::domain::descriptor::CrashDescriptor;
use crate::domain::record::CrashInfo;
use std::sync::Arc;
use strategy::{Attribute, Count};
use tracing::trace;

/// Host objects supplied with one crash callback.
///
/// Which objects are present depends on the interception point that fired.
#[derive(Debug, Clone, Default)]
pub struct RawCrashCallback {
    /// Errors controller
    pub errors: Option<Arc<dyn HostHandle>>,
    /// Process record of the crashed process
    pub process_record: Option<Arc<dyn HostHandle>>,
    /// Dialog result data
    pub result_data: Option<Arc<dyn HostHandle>>,
    /// Exception details
    pub crash_info: Option<Arc<dyn HostHandle>>,
}

impl RawCrashCallback {
    /// Create a callback with no objects attached.
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach the errors controller.
    pub fn with_errors(mut self, errors: Arc<dyn HostHandle>) -> Self {
        self.errors = Some(errors);
        self
    }

    /// Attach the process record.
    pub fn with_process_record(mut self, record: Arc<dyn HostHandle>) -> Self {
        self.process_record = Some(record);
        self
    }

    /// Attach the dialog result data.
    pub fn with_result_data(mut self, data: Arc<dyn HostHandle>) -> Self {
        self.result_data = Some(data);
        self
    }

    /// Attach exception details.
    pub fn with_crash_info(mut self, crash_info: Arc<dyn HostHandle>) -> Self {
        self.crash_info = Some(crash_info);
        self
    }
}

/// Accessor tables used by the extractor.
///
/// The default covers every host version known so far. Hosts with unusual
/// layouts can swap single attributes.
#[derive(Debug, Clone, Copy)]
pub struct HostLayout {
    pub process_record: Attribute,
    pub pid: Attribute,
    pub user_id: Attribute,
    pub process_name: Attribute,
    pub app_info: Attribute,
    pub package_name: Attribute,
    pub package_list: Attribute,
    pub repeating: Attribute,
    pub service: Attribute,
    pub user_controller: Attribute,
    pub profile_ids: Attribute,
    pub exception_class: Attribute,
    pub exception_message: Attribute,
    pub throw_file: Attribute,
    pub throw_line: Attribute,
    pub stack_trace: Attribute,
}

impl Default for HostLayout {
    fn default() -> Self {
        Self {
            process_record: fields::PROCESS_RECORD,
            pid: fields::PID,
            user_id: fields::USER_ID,
            process_name: fields::PROCESS_NAME,
            app_info: fields::APP_INFO,
            package_name: fields::PACKAGE_NAME,
            package_list: fields::PACKAGE_LIST,
            repeating: fields::REPEATING,
            service: fields::SERVICE,
            user_controller: fields::USER_CONTROLLER,
            profile_ids: fields::PROFILE_IDS,
            exception_class: fields::EXCEPTION_CLASS,
            exception_message: fields::EXCEPTION_MESSAGE,
            throw_file: fields::THROW_FILE,
            throw_line: fields::THROW_LINE,
            stack_trace: fields::STACK_TRACE,
        }
    }
}

/// Builds descriptors from raw callbacks.
#[derive(Debug, Clone, Default)]
pub struct CrashContextExtractor {
    layout: HostLayout,
}

impl CrashContextExtractor {
    /// Create an extractor with the default layout.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an extractor with a custom layout.
    pub fn with_layout(layout: HostLayout) -> Self {
        Self { layout }
    }

    /// Get the accessor layout.
    pub fn layout(&self) -> &HostLayout {
        &self.layout
    }

    /// Extract a descriptor. Never fails; unreadable fields take defaults.
    pub fn extract(&self, raw: &RawCrashCallback) -> CrashDescriptor {
        let layout = &self.layout;
        let result_data = raw.result_data.as_deref();
        let errors = raw.errors.as_deref();

        let recovered: Option<Arc<dyn HostHandle>> = match raw.process_record {
            Some(_) => None,
            None => layout.process_record.resolve_any(&[result_data]),
        };
        let record = raw.process_record.as_deref().or(recovered.as_deref());

        let pid = layout.pid.resolve_any::<i32>(&[record]).unwrap_or(0);
        let user_id = layout.user_id.resolve_any::<i32>(&[record]).unwrap_or(0);
        let process_name = layout
            .process_name
            .resolve_any::<String>(&[record])
            .unwrap_or_default();

        let app_info: Option<Arc<dyn HostHandle>> = layout.app_info.resolve_any(&[record]);
        let package_name = app_info
            .as_deref()
            .and_then(|info| layout.package_name.resolve_any::<String>(&[Some(info)]));
        let package_count = layout.package_list.resolve_any::<Count>(&[record]);
        let repeating = layout
            .repeating
            .resolve_any::<bool>(&[result_data, record])
            .unwrap_or(false);
        let background = self.is_background(record, errors, user_id);
        let crash_info = raw
            .crash_info
            .as_deref()
            .map(|info| self.crash_info(info))
            .unwrap_or_default();

        trace!(
            pid,
            user_id,
            process = %process_name,
            has_app_info = app_info.is_some(),
            background,
            repeating,
            "crash context extracted"
        );

        let mut builder = CrashDescriptor::builder(pid, process_name)
            .user_id(user_id)
            .has_app_info(app_info.is_some())
            .background(background)
            .repeating(repeating)
            .crash_info(crash_info);
        if let Some(package) = package_name {
            builder = builder.package_name(package);
        }
        if let Some(Count(count)) = package_count {
            builder = builder.package_count(count);
        }
        builder.build()
    }

    /// A process is background when its user is not among the foreground
    /// profiles. Any missing link in the lookup chain means foreground.
    fn is_background(
        &self,
        record: Option<&dyn HostHandle>,
        errors: Option<&dyn HostHandle>,
        user_id: i32,
    ) -> bool {
        match self.foreground_profiles(record, errors) {
            Some(ids) if !ids.is_empty() => !ids.contains(&i64::from(user_id)),
            _ => false,
        }
    }

    fn foreground_profiles(
        &self,
        record: Option<&dyn HostHandle>,
        errors: Option<&dyn HostHandle>,
    ) -> Option<Vec<i64>> {
        let service: Arc<dyn HostHandle> = self.layout.service.resolve_any(&[record, errors])?;
        let controller: Arc<dyn HostHandle> = self
            .layout
            .user_controller
            .resolve_any(&[Some(service.as_ref())])?;
        self.layout
            .profile_ids
            .resolve_any(&[Some(controller.as_ref())])
    }

    fn crash_info(&self, handle: &dyn HostHandle) -> CrashInfo {
        let layout = &self.layout;
        let root = [Some(handle)];
        CrashInfo {
            exception_class: layout.exception_class.resolve_any(&root).unwrap_or_default(),
            exception_message: layout
                .exception_message
                .resolve_any(&root)
                .unwrap_or_default(),
            throw_file: layout.throw_file.resolve_any(&root).unwrap_or_default(),
            throw_line: layout.throw_line.resolve_any(&root).unwrap_or(0),
            stack_trace: layout.stack_trace.resolve_any(&root).unwrap_or_default(),
        }
    }
}
