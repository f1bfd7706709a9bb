//! Resolution error taxonomy.
//!
//! Per-node failures degrade the node and continue with its siblings; the
//! completeness check is the one condition that fails the whole pass.

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum NodeError {
    #[error("the {kind} '{name}' is not registered")]
    MissingFragment { kind: &'static str, name: String },
    #[error("the {kind} '{name}' expands into itself")]
    RecursiveFragment { kind: &'static str, name: String },
    #[error("the component '{name}' was not found in screen '{screen}'")]
    UnknownComponent { screen: String, name: String },
    #[error("the source '{path}' was not found in screen '{screen}'")]
    UnknownSource { screen: String, path: String },
    #[error("the source '{path}' needs a renderer declared with a 'render' attribute")]
    MissingRenderer { path: String },
    #[error("the renderer '{name}' is not registered")]
    UnknownRenderer { name: String },
    #[error("the converter '{name}' is not registered")]
    UnknownConverter { name: String },
    #[error("a 'convert' element needs a 'type' attribute")]
    MissingConverterType,
    #[error("the attribute '{name}' is not recognized")]
    UnknownAttribute { name: String },
    #[error("the applet hook '{name}' is unknown, only 'onLayoutFinish' runs")]
    UnknownHook { name: String },
    #[error("an applet needs code text")]
    EmptyApplet,
    #[error("the screen '{name}' referred to by a panel is not registered")]
    MissingPanelScreen { name: String },
    #[error("a widget needs a 'name' or a 'source' attribute")]
    WidgetWithoutBinding,
}

/// One degraded node, kept for the resolution report.
#[derive(Debug, PartialEq, Eq)]
pub struct NodeFailure {
    /// Name of the document the node came from.
    pub document: String,
    /// Tag of the node that failed.
    pub node: String,
    pub error: NodeError,
}

/// The contract violation that fails a resolution pass: bindable live
/// components the document never bound.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ResolveError {
    #[error("components in '{document}' without a skin entry: {}", .names.join(", "))]
    UnboundComponents { document: String, names: Vec<String> },
}
