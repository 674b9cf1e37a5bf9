use serde::{Deserialize, Serialize};

use super::InvalidEnum;

/// Macro to generate enum with as_str + std::str::FromStr pattern.
/// The canonical string doubles as the serde wire form.
macro_rules! str_enum {
    ($name:ident { $($variant:ident => $s:literal),+ $(,)? }) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $(#[serde(rename = $s)] $variant),+
        }

        impl $name {
            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $s),+
                }
            }
        }

        impl std::str::FromStr for $name {
            type Err = InvalidEnum;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($s => Ok(Self::$variant)),+,
                    _ => Err(InvalidEnum {
                        field: stringify!($name).into(),
                        value: s.into(),
                    }),
                }
            }
        }
    };
}

// Document categories keep their Korean wire labels — the document sets
// under analysis and the consumers of the response speak the same labels.
str_enum!(DocType {
    Proposal => "기안",
    Contract => "계약서",
    Completion => "준공",
    DesignChange => "설계변경",
    ChangeContract => "변경계약",
    Expenditure => "지출",
    Uncategorized => "기타",
});

str_enum!(WorkflowPhase {
    Plan => "plan",
    Contract => "contract",
    Execute => "execute",
    Close => "close",
    Other => "etc",
});

impl DocType {
    /// Static mapping of document category to administrative workflow phase.
    /// Used for grouping and timeline placement, never inferred from content.
    pub fn phase(&self) -> WorkflowPhase {
        match self {
            Self::Proposal | Self::DesignChange => WorkflowPhase::Plan,
            Self::Contract | Self::ChangeContract => WorkflowPhase::Contract,
            Self::Completion => WorkflowPhase::Execute,
            Self::Expenditure => WorkflowPhase::Close,
            Self::Uncategorized => WorkflowPhase::Other,
        }
    }
}

str_enum!(RecordStatus {
    Normal => "normal",
    Warning => "warning",
});

str_enum!(Severity {
    Warning => "warning",
    Error => "error",
});

str_enum!(FindingKind {
    MissingDocument => "missing_document",
    AmountMismatch => "amount_mismatch",
    DateOrder => "date_order",
    MissingChangeContract => "missing_change_contract",
});

str_enum!(ValidationStatus {
    Ok => "ok",
    Warning => "warning",
    Error => "error",
});

str_enum!(JobState {
    Pending => "pending",
    Analyzing => "analyzing",
    Done => "done",
    Error => "error",
});

impl JobState {
    /// Terminal states are never left except by an entirely new job.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Done | Self::Error)
    }
}
