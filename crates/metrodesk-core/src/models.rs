//! Core data models for metrodesk.
//!
//! These types are shared across all metrodesk crates and represent the
//! domain entities of the workflow console: conversion documents,
//! notifications, collaborative drafts, and search results.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// =============================================================================
// CONVERSION TYPES
// =============================================================================

/// Lifecycle status of a document in the conversion queue.
///
/// Transitions are monotonic: `Queued -> Processing -> {Converted | Failed}`.
/// A document never re-enters an earlier status once it has left it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentStatus {
    /// Accepted, waiting to start
    Queued,
    /// Conversion in flight
    Processing,
    /// Terminal: conversion succeeded
    Converted,
    /// Terminal: conversion failed
    Failed,
}

impl DocumentStatus {
    /// Whether no further automatic transition occurs from this status.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Converted | Self::Failed)
    }

    /// Whether the state machine permits moving from `self` to `next`.
    pub fn can_transition(&self, next: DocumentStatus) -> bool {
        matches!(
            (self, next),
            (Self::Queued, Self::Processing)
                | (Self::Processing, Self::Converted)
                | (Self::Processing, Self::Failed)
        )
    }
}

impl std::fmt::Display for DocumentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Queued => write!(f, "queued"),
            Self::Processing => write!(f, "processing"),
            Self::Converted => write!(f, "converted"),
            Self::Failed => write!(f, "failed"),
        }
    }
}

impl std::str::FromStr for DocumentStatus {
    type Err = String;
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "queued" => Ok(Self::Queued),
            "processing" => Ok(Self::Processing),
            "converted" => Ok(Self::Converted),
            "failed" => Ok(Self::Failed),
            _ => Err(format!("Invalid document status: {}", s)),
        }
    }
}

/// Declared (or auto-detected) input format of an upload.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceFormat {
    /// Let the backend detect the format
    #[default]
    Auto,
    Pdf,
    Word,
    Excel,
    Image,
    Text,
}

impl std::fmt::Display for SourceFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Auto => write!(f, "auto"),
            Self::Pdf => write!(f, "pdf"),
            Self::Word => write!(f, "word"),
            Self::Excel => write!(f, "excel"),
            Self::Image => write!(f, "image"),
            Self::Text => write!(f, "text"),
        }
    }
}

impl std::str::FromStr for SourceFormat {
    type Err = String;
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "auto" => Ok(Self::Auto),
            "pdf" => Ok(Self::Pdf),
            "word" => Ok(Self::Word),
            "excel" => Ok(Self::Excel),
            "image" => Ok(Self::Image),
            "text" => Ok(Self::Text),
            _ => Err(format!("Invalid source format: {}", s)),
        }
    }
}

/// Requested output format of a conversion.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetFormat {
    #[default]
    Pdf,
    Word,
    Excel,
    Text,
    Csv,
}

impl std::fmt::Display for TargetFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pdf => write!(f, "pdf"),
            Self::Word => write!(f, "word"),
            Self::Excel => write!(f, "excel"),
            Self::Text => write!(f, "text"),
            Self::Csv => write!(f, "csv"),
        }
    }
}

impl std::str::FromStr for TargetFormat {
    type Err = String;
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pdf" => Ok(Self::Pdf),
            "word" => Ok(Self::Word),
            "excel" => Ok(Self::Excel),
            "text" => Ok(Self::Text),
            "csv" => Ok(Self::Csv),
            _ => Err(format!("Invalid target format: {}", s)),
        }
    }
}

/// Conversion quality setting. Affects only reported metadata; the queue
/// passes it through to the backend untouched.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Quality {
    #[default]
    High,
    Medium,
    Fast,
}

impl std::fmt::Display for Quality {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::High => write!(f, "high"),
            Self::Medium => write!(f, "medium"),
            Self::Fast => write!(f, "fast"),
        }
    }
}

impl std::str::FromStr for Quality {
    type Err = String;
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "high" => Ok(Self::High),
            "medium" => Ok(Self::Medium),
            "fast" => Ok(Self::Fast),
            _ => Err(format!("Invalid quality: {}", s)),
        }
    }
}

/// Settings applied to every file of one submission batch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversionSettings {
    pub source_format: SourceFormat,
    pub target_format: TargetFormat,
    pub quality: Quality,
    /// Forwarded to the conversion backend for text extraction from images.
    pub ocr_enabled: bool,
}

impl Default for ConversionSettings {
    fn default() -> Self {
        Self {
            source_format: SourceFormat::Auto,
            target_format: TargetFormat::Pdf,
            quality: Quality::High,
            ocr_enabled: true,
        }
    }
}

/// Opaque file descriptor handed over by the upload surface.
///
/// The core never reads file bytes; name, declared content type, and byte
/// size are all it carries.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileUpload {
    pub name: String,
    pub content_type: String,
    pub size_bytes: u64,
}

impl FileUpload {
    pub fn new(name: impl Into<String>, content_type: impl Into<String>, size_bytes: u64) -> Self {
        Self {
            name: name.into(),
            content_type: content_type.into(),
            size_bytes,
        }
    }
}

/// A document moving through the conversion queue.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    pub id: Uuid,
    pub name: String,
    pub content_type: String,
    pub size_bytes: u64,
    pub source_format: SourceFormat,
    pub target_format: TargetFormat,
    pub quality: Quality,
    pub ocr_enabled: bool,
    pub uploaded_at: DateTime<Utc>,
    pub status: DocumentStatus,
}

impl Document {
    /// Create a freshly queued document from an upload and batch settings.
    pub fn from_upload(file: &FileUpload, settings: &ConversionSettings) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: file.name.clone(),
            content_type: file.content_type.clone(),
            size_bytes: file.size_bytes,
            source_format: settings.source_format,
            target_format: settings.target_format,
            quality: settings.quality,
            ocr_enabled: settings.ocr_enabled,
            uploaded_at: Utc::now(),
            status: DocumentStatus::Queued,
        }
    }

    /// Human-readable size, e.g. "2.40 MB".
    pub fn size_label(&self) -> String {
        format!("{:.2} MB", self.size_bytes as f64 / 1024.0 / 1024.0)
    }
}

// =============================================================================
// NOTIFICATION TYPES
// =============================================================================

/// Notification priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    Medium,
    High,
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Low => write!(f, "low"),
            Self::Medium => write!(f, "medium"),
            Self::High => write!(f, "high"),
        }
    }
}

impl std::str::FromStr for Priority {
    type Err = String;
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            _ => Err(format!("Invalid priority: {}", s)),
        }
    }
}

/// View filter for the notification list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationFilter {
    #[default]
    All,
    Unread,
    /// High priority only, regardless of read state
    HighPriority,
}

/// A notification pushed by an external event source.
///
/// The core only manages the read flag; notifications are never deleted here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notification {
    pub id: Uuid,
    pub title: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    pub priority: Priority,
    pub category: String,
    pub read: bool,
}

/// Request payload for pushing a notification into the store.
#[derive(Debug, Clone)]
pub struct NewNotification {
    pub title: String,
    pub message: String,
    pub priority: Priority,
    pub category: String,
    /// Event time; defaults to now when absent.
    pub timestamp: Option<DateTime<Utc>>,
}

// =============================================================================
// COLLABORATIVE DRAFT TYPES
// =============================================================================

/// Workflow phase of a collaborative draft.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CollabDocStatus {
    #[default]
    Draft,
    Review,
    Published,
}

impl std::fmt::Display for CollabDocStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Draft => write!(f, "draft"),
            Self::Review => write!(f, "review"),
            Self::Published => write!(f, "published"),
        }
    }
}

impl std::str::FromStr for CollabDocStatus {
    type Err = String;
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "draft" => Ok(Self::Draft),
            "review" => Ok(Self::Review),
            "published" => Ok(Self::Published),
            _ => Err(format!("Invalid draft status: {}", s)),
        }
    }
}

/// The live state of a collaboratively edited document.
///
/// `version` always equals the highest recorded snapshot number; the number
/// sequence for one draft is strictly increasing and gap-free from 1.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollabDoc {
    pub id: Uuid,
    pub title: String,
    pub content: String,
    /// Insertion-ordered set of collaborator names.
    pub collaborators: Vec<String>,
    pub last_modified: DateTime<Utc>,
    pub version: i32,
    pub status: CollabDocStatus,
}

/// Immutable content capture at one version number.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VersionSnapshot {
    pub version: i32,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// SEARCH TYPES
// =============================================================================

/// File kind of a corpus entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocKind {
    Pdf,
    Word,
    Scan,
    Excel,
}

impl std::fmt::Display for DocKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pdf => write!(f, "pdf"),
            Self::Word => write!(f, "word"),
            Self::Scan => write!(f, "scan"),
            Self::Excel => write!(f, "excel"),
        }
    }
}

/// Which language variant of corpus content a query matches against.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LanguageScope {
    En,
    Ml,
    #[default]
    Both,
}

/// File-type narrowing for search, conjunctive with the query match.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TypeFilter {
    #[default]
    All,
    Pdf,
    Word,
    Excel,
    Scan,
}

impl TypeFilter {
    /// Whether a corpus entry of the given kind passes this filter.
    pub fn matches(&self, kind: DocKind) -> bool {
        match self {
            Self::All => true,
            Self::Pdf => kind == DocKind::Pdf,
            Self::Word => kind == DocKind::Word,
            Self::Excel => kind == DocKind::Excel,
            Self::Scan => kind == DocKind::Scan,
        }
    }
}

/// Department narrowing for search, conjunctive with the other criteria.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum DepartmentFilter {
    #[default]
    All,
    Department(String),
}

impl DepartmentFilter {
    /// Case-insensitive match against a corpus entry's department.
    pub fn matches(&self, department: &str) -> bool {
        match self {
            Self::All => true,
            Self::Department(name) => name.eq_ignore_ascii_case(department),
        }
    }
}

impl std::str::FromStr for DepartmentFilter {
    type Err = String;
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("all") {
            Ok(Self::All)
        } else if s.trim().is_empty() {
            Err("Empty department filter".to_string())
        } else {
            Ok(Self::Department(s.to_string()))
        }
    }
}

/// A single search request: query text plus conjunctive filters.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchRequest {
    pub query: String,
    pub language: LanguageScope,
    pub type_filter: TypeFilter,
    pub department: DepartmentFilter,
}

impl SearchRequest {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            ..Self::default()
        }
    }

    pub fn with_language(mut self, language: LanguageScope) -> Self {
        self.language = language;
        self
    }

    pub fn with_type_filter(mut self, filter: TypeFilter) -> Self {
        self.type_filter = filter;
        self
    }

    pub fn with_department(mut self, department: DepartmentFilter) -> Self {
        self.department = department;
        self
    }
}

/// A ranked search hit. Recomputed per query; never persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResult {
    pub id: Uuid,
    pub title: String,
    /// Content excerpt from the matched language variant.
    pub snippet: String,
    pub kind: DocKind,
    pub department: String,
    pub last_modified: DateTime<Utc>,
    /// Upstream-computed relevance in [0, 100]. Opaque to the engine.
    pub relevance_score: f32,
}
