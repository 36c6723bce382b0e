use serde::{Deserialize, Serialize};

/// The fixed four-step sequence of the wizard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WizardStage {
    Upload,
    Preview,
    Score,
    Explanation,
}

impl WizardStage {
    pub const fn ordered() -> [Self; 4] {
        [Self::Upload, Self::Preview, Self::Score, Self::Explanation]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Upload => "Upload Documents",
            Self::Preview => "Preview Data",
            Self::Score => "Credit Score",
            Self::Explanation => "Explanation",
        }
    }

    pub const fn index(self) -> usize {
        match self {
            Self::Upload => 0,
            Self::Preview => 1,
            Self::Score => 2,
            Self::Explanation => 3,
        }
    }

    pub fn progress(self) -> Vec<StepView> {
        Self::ordered()
            .into_iter()
            .map(|stage| StepView {
                stage,
                label: stage.label(),
                state: if stage == self {
                    StepState::Current
                } else if stage < self {
                    StepState::Completed
                } else {
                    StepState::Pending
                },
            })
            .collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StepState {
    Completed,
    Current,
    Pending,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StepView {
    pub stage: WizardStage,
    pub label: &'static str,
    pub state: StepState,
}
