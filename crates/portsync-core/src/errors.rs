use portsync_core_types::RequestId;
use thiserror::Error;

/// Result type alias using ExError
pub type Result<T> = std::result::Result<T, ExError>;

// ========== Error Facility ==========

/// Canonical error kind taxonomy
///
/// Each kind maps to a stable error code for programmatic handling and to a
/// distinct process exit code for the CLI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExErrorKind {
    // Caller input
    InvalidInput,
    SlotCountMismatch,

    // Lookup
    NotFound,
    AmbiguousMatch,

    // Document integrity
    MalformedDocument,
    UnresolvableAttachment,
    IpCollision,

    // Integration/IO
    Io,
    Serialization,
    ExternalService,

    // Internal
    Internal,
}

impl ExErrorKind {
    /// Get the stable error code for this kind
    pub fn code(&self) -> &'static str {
        match self {
            ExErrorKind::InvalidInput => "ERR_INVALID_INPUT",
            ExErrorKind::SlotCountMismatch => "ERR_SLOT_COUNT_MISMATCH",
            ExErrorKind::NotFound => "ERR_NOT_FOUND",
            ExErrorKind::AmbiguousMatch => "ERR_AMBIGUOUS_MATCH",
            ExErrorKind::MalformedDocument => "ERR_MALFORMED_DOCUMENT",
            ExErrorKind::UnresolvableAttachment => "ERR_UNRESOLVABLE_ATTACHMENT",
            ExErrorKind::IpCollision => "ERR_IP_COLLISION",
            ExErrorKind::Io => "ERR_IO",
            ExErrorKind::Serialization => "ERR_SERIALIZATION",
            ExErrorKind::ExternalService => "ERR_EXTERNAL_SERVICE",
            ExErrorKind::Internal => "ERR_INTERNAL",
        }
    }

    /// Process exit code reported by the CLI for this kind
    ///
    /// `2` matches clap's usage-error code so every caller-input problem
    /// exits the same way.
    pub fn exit_code(&self) -> i32 {
        match self {
            ExErrorKind::InvalidInput => 2,
            ExErrorKind::NotFound => 3,
            ExErrorKind::AmbiguousMatch => 4,
            ExErrorKind::MalformedDocument => 5,
            ExErrorKind::UnresolvableAttachment => 6,
            ExErrorKind::SlotCountMismatch => 7,
            ExErrorKind::IpCollision => 8,
            ExErrorKind::Io => 10,
            ExErrorKind::Serialization => 11,
            ExErrorKind::ExternalService => 12,
            ExErrorKind::Internal => 70,
        }
    }
}

/// Canonical structured error type
#[derive(Debug, Clone)]
pub struct ExError {
    kind: ExErrorKind,
    op: Option<String>,
    resource: Option<String>,
    slot: Option<String>,
    request_id: Option<RequestId>,
    message: String,
}

impl ExError {
    /// Create a new error with the specified kind
    pub fn new(kind: ExErrorKind) -> Self {
        Self {
            kind,
            op: None,
            resource: None,
            slot: None,
            request_id: None,
            message: String::new(),
        }
    }

    /// Add operation context
    pub fn with_op(mut self, op: impl Into<String>) -> Self {
        self.op = Some(op.into());
        self
    }

    /// Add the offending resource address (`type.name`)
    pub fn with_resource(mut self, resource: impl Into<String>) -> Self {
        self.resource = Some(resource.into());
        self
    }

    /// Add the port slot name
    pub fn with_slot(mut self, slot: impl Into<String>) -> Self {
        self.slot = Some(slot.into());
        self
    }

    /// Add request ID context
    pub fn with_request_id(mut self, request_id: RequestId) -> Self {
        self.request_id = Some(request_id);
        self
    }

    /// Add custom message
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    pub fn kind(&self) -> ExErrorKind {
        self.kind
    }

    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    pub fn exit_code(&self) -> i32 {
        self.kind.exit_code()
    }

    pub fn op(&self) -> Option<&str> {
        self.op.as_deref()
    }

    pub fn resource(&self) -> Option<&str> {
        self.resource.as_deref()
    }

    pub fn slot(&self) -> Option<&str> {
        self.slot.as_deref()
    }

    pub fn request_id(&self) -> Option<&RequestId> {
        self.request_id.as_ref()
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl std::fmt::Display for ExError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}]", self.code())?;
        if let Some(op) = &self.op {
            write!(f, " in operation '{}'", op)?;
        }
        if !self.message.is_empty() {
            write!(f, ": {}", self.message)?;
        }
        if let Some(resource) = &self.resource {
            write!(f, " (resource: {})", resource)?;
        }
        if let Some(slot) = &self.slot {
            write!(f, " (slot: {})", slot)?;
        }
        if let Some(request_id) = &self.request_id {
            write!(f, " (request_id: {})", request_id)?;
        }
        Ok(())
    }
}

impl std::error::Error for ExError {}

// ========== End Error Facility ==========

/// Domain error taxonomy for state reconciliation
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PortSyncError {
    // ===== Caller input =====
    /// A `slot:network` pair could not be parsed
    #[error("Invalid port declaration '{entry}': {reason}")]
    InvalidPortDeclaration { entry: String, reason: String },

    /// The same slot name was declared twice
    #[error("Port slot declared more than once: {slot}")]
    DuplicateSlot { slot: String },

    /// Attachment count and slot count differ
    #[error("Instance {tf_name} has {attachments} network attachments but {slots} port slots were declared")]
    SlotCountMismatch {
        tf_name: String,
        attachments: usize,
        slots: usize,
    },

    // ===== Lookup =====
    /// No compute-instance resource with this name in the document
    #[error("Compute instance not found in state: {tf_name}")]
    InstanceNotDeclared { tf_name: String },

    /// Live inventory returned no server for the pattern
    #[error("No live server matches {pattern}")]
    ServerNotFound { pattern: String },

    /// Live inventory returned several servers for the pattern
    #[error("Wrong server count for {pattern}: {count}")]
    AmbiguousServer { pattern: String, count: usize },

    // ===== Document integrity =====
    /// A resource lacks an attribute the reconciler needs
    #[error("Malformed resource {resource}: {reason}")]
    MalformedResource { resource: String, reason: String },

    /// An unbound attachment's IP is known neither to the document nor to live inventory
    #[error("Attachment {position} (slot {slot}) with IP {ip} matches no declared port and no live interface")]
    UnresolvableAttachment {
        slot: String,
        position: usize,
        ip: String,
    },

    /// The same IP is bound to two different ports or interfaces
    #[error("IP {ip} is claimed by both {first} and {second}")]
    IpCollision {
        ip: String,
        first: String,
        second: String,
    },

    // ===== Generic =====
    /// JSON encoding/decoding failure
    #[error("Serialization error: {message}")]
    Serialization { message: String },

    /// Generic internal error
    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl From<PortSyncError> for ExError {
    fn from(err: PortSyncError) -> Self {
        let message = err.to_string();
        match err {
            PortSyncError::InvalidPortDeclaration { .. } => {
                ExError::new(ExErrorKind::InvalidInput)
                    .with_op("parse_port_slots")
                    .with_message(message)
            }

            PortSyncError::DuplicateSlot { slot } => ExError::new(ExErrorKind::InvalidInput)
                .with_op("parse_port_slots")
                .with_slot(slot)
                .with_message(message),

            PortSyncError::SlotCountMismatch { tf_name, .. } => {
                ExError::new(ExErrorKind::SlotCountMismatch)
                    .with_op("reconcile")
                    .with_resource(tf_name)
                    .with_message(message)
            }

            PortSyncError::InstanceNotDeclared { tf_name } => ExError::new(ExErrorKind::NotFound)
                .with_op("reconcile")
                .with_resource(tf_name)
                .with_message(message),

            PortSyncError::ServerNotFound { .. } => ExError::new(ExErrorKind::NotFound)
                .with_op("snapshot")
                .with_message(message),

            PortSyncError::AmbiguousServer { .. } => ExError::new(ExErrorKind::AmbiguousMatch)
                .with_op("snapshot")
                .with_message(message),

            PortSyncError::MalformedResource { resource, .. } => {
                ExError::new(ExErrorKind::MalformedDocument)
                    .with_resource(resource)
                    .with_message(message)
            }

            PortSyncError::UnresolvableAttachment { slot, .. } => {
                ExError::new(ExErrorKind::UnresolvableAttachment)
                    .with_op("reconcile")
                    .with_slot(slot)
                    .with_message(message)
            }

            PortSyncError::IpCollision { .. } => ExError::new(ExErrorKind::IpCollision)
                .with_message(message),

            PortSyncError::Serialization { .. } => ExError::new(ExErrorKind::Serialization)
                .with_message(message),

            PortSyncError::Internal { .. } => ExError::new(ExErrorKind::Internal)
                .with_message(message),
        }
    }
}

impl From<serde_json::Error> for ExError {
    fn from(err: serde_json::Error) -> Self {
        PortSyncError::Serialization {
            message: err.to_string(),
        }
        .into()
    }
}
