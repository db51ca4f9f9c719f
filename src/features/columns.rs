//! Column names of the flattened Cowrie export and the fixed event-type vocabulary.

use serde::{Deserialize, Serialize};

pub const SESSION_COLUMN: &str = "data.session";
pub const EVENT_ID_COLUMN: &str = "data.eventid";
pub const MESSAGE_COLUMN: &str = "data.message";
pub const UPTIME_COLUMN: &str = "data.src_uptime_sec";
pub const BRUTE_FORCE_COLUMN: &str = "data.bf";

/// Non-predictive or leakage-prone columns removed before aggregation.
pub const PRUNED_COLUMNS: &[&str] = &[
    "_id.$oid",
    "data.src_port",
    "data.timestamp",
    "data.weather",
    "data.port",
    "data.size",
    "data.shasum",
    "data.ttylog",
    "data.duplicate",
    "data.duration",
    "data.sen_os",
    "data.sen_ver",
    "data.src_os_flavor",
    "data.hassh",
    "data.hasshAlgorithms",
    "data.kexAlgs",
    "data.keyAlgs",
    "data.encCS",
    "data.macCS",
    "data.compCS",
    "data.langCS",
    "data.username",
    "data.password",
    "data.version",
    "data.arch",
    "data.input",
    "data.sensor_geo.$binary.subType",
    "data.sensor_segment.$binary.subType",
];

/// Known event ids; each maps to a fixed count column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EventType {
    LogClosed,
    ClientKex,
    LoginSuccess,
    SessionClosed,
    ClientVersion,
    SessionParams,
    CommandInput,
    FileDownload,
    FileDownloadFailed,
    CommandFailed,
    FileUpload,
    ClientVar,
    CommandSuccess,
}

impl EventType {
    pub const ALL: [EventType; 13] = [
        EventType::LogClosed,
        EventType::ClientKex,
        EventType::LoginSuccess,
        EventType::SessionClosed,
        EventType::ClientVersion,
        EventType::SessionParams,
        EventType::CommandInput,
        EventType::FileDownload,
        EventType::FileDownloadFailed,
        EventType::CommandFailed,
        EventType::FileUpload,
        EventType::ClientVar,
        EventType::CommandSuccess,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            EventType::LogClosed => "log.closed",
            EventType::ClientKex => "client.kex",
            EventType::LoginSuccess => "login.success",
            EventType::SessionClosed => "session.closed",
            EventType::ClientVersion => "client.version",
            EventType::SessionParams => "session.params",
            EventType::CommandInput => "command.input",
            EventType::FileDownload => "session.file_download",
            EventType::FileDownloadFailed => "session.file_download.failed",
            EventType::CommandFailed => "command.failed",
            EventType::FileUpload => "session.file_upload",
            EventType::ClientVar => "client.var",
            EventType::CommandSuccess => "command.success",
        }
    }

    pub fn from_id(id: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|t| t.as_str() == id)
    }

    pub fn index(self) -> usize {
        self as usize
    }
}

/// Session columns replaced by integer codes before modelling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Categorical {
    Ip,
    SensorGeo,
    SensorSegment,
    IpCountry,
    Message,
    Sensor,
    SrcIp,
    SenDist,
    SrcLanguage,
    SrcOsName,
}

impl Categorical {
    pub const ALL: [Categorical; 10] = [
        Categorical::Ip,
        Categorical::SensorGeo,
        Categorical::SensorSegment,
        Categorical::IpCountry,
        Categorical::Message,
        Categorical::Sensor,
        Categorical::SrcIp,
        Categorical::SenDist,
        Categorical::SrcLanguage,
        Categorical::SrcOsName,
    ];

    pub fn column(self) -> &'static str {
        match self {
            Categorical::Ip => "ip",
            Categorical::SensorGeo => "data.sensor_geo.$binary.base64",
            Categorical::SensorSegment => "data.sensor_segment.$binary.base64",
            Categorical::IpCountry => "data.ip_country",
            Categorical::Message => MESSAGE_COLUMN,
            Categorical::Sensor => "data.sensor",
            Categorical::SrcIp => "data.src_ip",
            Categorical::SenDist => "data.sen_dist",
            Categorical::SrcLanguage => "data.src_language",
            Categorical::SrcOsName => "data.src_os_name",
        }
    }

    /// Literal source identifiers; never handed to the model.
    pub fn is_identifier(self) -> bool {
        matches!(self, Categorical::Ip | Categorical::SrcIp)
    }

    /// Categorical columns folded from a session's rows (everything but the message blob).
    pub fn is_session_constant(self) -> bool {
        self != Categorical::Message
    }
}
