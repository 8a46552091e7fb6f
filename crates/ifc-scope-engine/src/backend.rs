// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Command recording render backend
//!
//! Hosts that drive a renderer living outside the Rust process (a JS scene in
//! the browser, a native view behind FFI) can hand a [`CommandRecorder`] to
//! the engine and forward the recorded commands as JSON after each batch.

use ifc_scope_model::{ElementId, HighlightStyle, ModelId, RenderBackend};
use serde::{Deserialize, Serialize};

/// One buffered renderer mutation
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "cmd", rename_all = "snake_case")]
pub enum RenderCommand {
    SetModelVisible {
        model: ModelId,
        visible: bool,
    },
    SetElementsVisible {
        model: ModelId,
        elements: Vec<ElementId>,
        visible: bool,
    },
    Highlight {
        model: ModelId,
        elements: Vec<ElementId>,
        style: HighlightStyle,
    },
    ResetHighlight {
        model: ModelId,
    },
    Commit,
}

/// [`RenderBackend`] that records every call
#[derive(Clone, Debug, Default)]
pub struct CommandRecorder {
    commands: Vec<RenderCommand>,
}

impl CommandRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Recorded commands, oldest first
    pub fn commands(&self) -> &[RenderCommand] {
        &self.commands
    }

    /// Take the recorded commands, leaving the recorder empty
    pub fn drain(&mut self) -> Vec<RenderCommand> {
        std::mem::take(&mut self.commands)
    }

    /// Number of commits recorded
    pub fn commit_count(&self) -> usize {
        self.commands
            .iter()
            .filter(|c| matches!(c, RenderCommand::Commit))
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Serialize the recorded commands as a JSON array
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(&self.commands)
    }
}

impl RenderBackend for CommandRecorder {
    fn set_model_visible(&mut self, model: &ModelId, visible: bool) {
        self.commands.push(RenderCommand::SetModelVisible {
            model: model.clone(),
            visible,
        });
    }

    fn set_elements_visible(&mut self, model: &ModelId, elements: &[ElementId], visible: bool) {
        self.commands.push(RenderCommand::SetElementsVisible {
            model: model.clone(),
            elements: elements.to_vec(),
            visible,
        });
    }

    fn highlight(&mut self, model: &ModelId, elements: &[ElementId], style: &HighlightStyle) {
        self.commands.push(RenderCommand::Highlight {
            model: model.clone(),
            elements: elements.to_vec(),
            style: style.clone(),
        });
    }

    fn reset_highlight(&mut self, model: &ModelId) {
        self.commands.push(RenderCommand::ResetHighlight {
            model: model.clone(),
        });
    }

    fn commit(&mut self) {
        self.commands.push(RenderCommand::Commit);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_records_in_order() {
        let mut rec = CommandRecorder::new();
        let model = ModelId::from("m1");
        rec.set_model_visible(&model, false);
        rec.reset_highlight(&model);
        rec.commit();

        assert_eq!(rec.commands().len(), 3);
        assert_eq!(rec.commit_count(), 1);
        assert_eq!(rec.commands()[2], RenderCommand::Commit);

        let drained = rec.drain();
        assert_eq!(drained.len(), 3);
        assert!(rec.is_empty());
    }

    #[test]
    fn test_json_shape() {
        let mut rec = CommandRecorder::new();
        rec.set_elements_visible(&ModelId::from("m1"), &[ElementId(3), ElementId(7)], true);
        rec.commit();

        let json: serde_json::Value = serde_json::from_str(&rec.to_json().unwrap()).unwrap();
        assert_eq!(json[0]["cmd"], "set_elements_visible");
        assert_eq!(json[0]["model"], "m1");
        assert_eq!(json[0]["elements"], serde_json::json!([3, 7]));
        assert_eq!(json[1]["cmd"], "commit");
    }
}
