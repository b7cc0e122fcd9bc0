//! The fixed set of lifecycle tasks the entrypoint knows how to call.

use std::fmt;

/// A named external lifecycle task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Task {
    Update,
    WaitForDbs,
    Migrations,
    Prepare,
    UpdateGeoIp,
    Fixtures,
    MonitoringFixture,
    Initialized,
    Statics,
    WaitForGeoServer,
    GeoServerFixture,
    UpdateAdmin,
}

impl Task {
    /// Tasks run on every startup, before the mode is selected.
    pub const PREFIX_BEFORE_ENV: [Task; 1] = [Task::Update];
    pub const PREFIX_AFTER_ENV: [Task; 2] = [Task::WaitForDbs, Task::Migrations];

    /// One-time initialization, gated by the first-start predicate.
    pub const FIRST_START: [Task; 4] = [
        Task::UpdateGeoIp,
        Task::Fixtures,
        Task::MonitoringFixture,
        Task::Initialized,
    ];

    /// Run on every production server start, after the first-start block.
    pub const PRODUCTION_SUFFIX: [Task; 4] = [
        Task::Statics,
        Task::WaitForGeoServer,
        Task::GeoServerFixture,
        Task::UpdateAdmin,
    ];

    /// Subcommand name understood by the task runner binary.
    pub fn name(self) -> &'static str {
        match self {
            Task::Update => "update",
            Task::WaitForDbs => "waitfordbs",
            Task::Migrations => "migrations",
            Task::Prepare => "prepare",
            Task::UpdateGeoIp => "updategeoip",
            Task::Fixtures => "fixtures",
            Task::MonitoringFixture => "monitoringfixture",
            Task::Initialized => "initialized",
            Task::Statics => "statics",
            Task::WaitForGeoServer => "waitforgeoserver",
            Task::GeoServerFixture => "geoserverfixture",
            Task::UpdateAdmin => "updateadmin",
        }
    }
}

impl fmt::Display for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
