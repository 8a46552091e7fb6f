// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Isolation controller
//!
//! Visibility has two levels: a whole model can be hidden, and inside a
//! visible model individual elements can be hidden. Highlighting is an
//! overlay on top of visibility.
//!
//! Every change runs inside a batch ([`IsolationController::update`]). The
//! batch pushes its per-model calls to the [`RenderBackend`] and ends with a
//! single commit, so the renderer never shows a half-applied state.
//!
//! Batches are guarded by a [`ViewTicket`]. A reset makes every ticket taken
//! before it stale, and stale batches are dropped without touching the
//! renderer. A flow started before the user pressed "show all" therefore
//! cannot re-isolate the view after the reset.

use ifc_scope_model::{
    ElementId, ElementRef, ElementSet, ElementUniverse, HighlightStyle, ModelId, RenderBackend,
};
use rustc_hash::{FxHashMap, FxHashSet};

/// Permission to apply a batch, valid until the next reset
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ViewTicket(u64);

impl ViewTicket {
    pub fn epoch(&self) -> u64 {
        self.0
    }
}

/// Result of a batch
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ApplyOutcome {
    /// Changes were pushed and committed
    Applied,
    /// A reset happened after the ticket was taken, nothing was pushed
    Superseded,
}

impl ApplyOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, ApplyOutcome::Applied)
    }
}

#[derive(Clone, Debug)]
struct ModelView {
    visible: bool,
    hidden: FxHashSet<ElementId>,
    highlighted: FxHashSet<ElementId>,
}

impl Default for ModelView {
    fn default() -> Self {
        Self {
            visible: true,
            hidden: FxHashSet::default(),
            highlighted: FxHashSet::default(),
        }
    }
}

/// Engine-side mirror of what the renderer shows
#[derive(Clone, Debug, Default)]
struct ViewState {
    models: FxHashMap<ModelId, ModelView>,
    highlight_style: Option<HighlightStyle>,
    isolating: bool,
}

/// Mutations available inside a batch
pub struct ViewUpdate<'a, U: ElementUniverse + ?Sized, B: RenderBackend + ?Sized> {
    state: &'a mut ViewState,
    universe: &'a U,
    backend: &'a mut B,
}

impl<U: ElementUniverse + ?Sized, B: RenderBackend + ?Sized> ViewUpdate<'_, U, B> {
    /// Show exactly the target elements
    ///
    /// Models without targets are hidden as a whole. Inside a model with
    /// targets, every other element is hidden. An empty target set hides
    /// every model. Elements that join the universe later stay visible until
    /// the next isolate.
    pub fn isolate(&mut self, targets: &ElementSet) {
        warn_unknown_models(targets, self.universe, "isolate");

        let mut shown = 0usize;
        for model in self.universe.model_ids() {
            let Some(all) = self.universe.model_elements(&model) else {
                continue;
            };
            let wanted = known_targets(targets, &model, all, "isolate");
            let view = self.state.models.entry(model.clone()).or_default();

            if wanted.is_empty() {
                self.backend.set_model_visible(&model, false);
                view.visible = false;
                continue;
            }

            let wanted_set: FxHashSet<ElementId> = wanted.iter().copied().collect();
            let mut others: Vec<ElementId> = all
                .iter()
                .copied()
                .filter(|id| !wanted_set.contains(id))
                .collect();
            others.sort_unstable();

            self.backend.set_model_visible(&model, true);
            if !others.is_empty() {
                self.backend.set_elements_visible(&model, &others, false);
            }
            self.backend.set_elements_visible(&model, &wanted, true);

            view.visible = true;
            view.hidden = others.into_iter().collect();
            shown += wanted.len();
        }

        self.state.isolating = true;
        log::debug!("[Isolation] Isolated {} elements", shown);
    }

    /// Make every model and element visible and drop all highlights
    pub fn show_all(&mut self) {
        let models = self.universe.model_ids();
        for model in &models {
            let Some(all) = self.universe.model_elements(model) else {
                continue;
            };
            let mut ids: Vec<ElementId> = all.iter().copied().collect();
            ids.sort_unstable();

            self.backend.set_model_visible(model, true);
            if !ids.is_empty() {
                self.backend.set_elements_visible(model, &ids, true);
            }
            self.backend.reset_highlight(model);
        }

        self.state.models.clear();
        self.state.highlight_style = None;
        self.state.isolating = false;
        log::debug!("[Isolation] Showing all {} models", models.len());
    }

    /// Highlight the target elements, replacing any previous highlight
    ///
    /// Visibility is not changed.
    pub fn highlight(&mut self, targets: &ElementSet, style: &HighlightStyle) {
        self.clear_highlight();
        warn_unknown_models(targets, self.universe, "highlight");

        for model in self.universe.model_ids() {
            let Some(all) = self.universe.model_elements(&model) else {
                continue;
            };
            let wanted = known_targets(targets, &model, all, "highlight");
            if wanted.is_empty() {
                continue;
            }
            self.backend.highlight(&model, &wanted, style);
            let view = self.state.models.entry(model).or_default();
            view.highlighted = wanted.into_iter().collect();
        }

        self.state.highlight_style = Some(style.clone());
    }

    /// Remove every highlight
    pub fn clear_highlight(&mut self) {
        let mut models: Vec<&ModelId> = self
            .state
            .models
            .iter()
            .filter(|(_, view)| !view.highlighted.is_empty())
            .map(|(model, _)| model)
            .collect();
        models.sort();
        for model in models {
            self.backend.reset_highlight(model);
        }

        for view in self.state.models.values_mut() {
            view.highlighted.clear();
        }
        self.state.highlight_style = None;
    }
}

/// Owns the visibility state and sequences batches against the renderer
#[derive(Clone, Debug, Default)]
pub struct IsolationController {
    epoch: u64,
    state: ViewState,
}

impl IsolationController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ticket for the current epoch
    pub fn ticket(&self) -> ViewTicket {
        ViewTicket(self.epoch)
    }

    /// Check if a ticket was taken after the latest reset
    pub fn is_current(&self, ticket: ViewTicket) -> bool {
        ticket.0 == self.epoch
    }

    /// Run a batch of changes followed by exactly one commit
    ///
    /// Stale tickets are rejected without any renderer call.
    pub fn update<U, B, F>(
        &mut self,
        ticket: ViewTicket,
        universe: &U,
        backend: &mut B,
        f: F,
    ) -> ApplyOutcome
    where
        U: ElementUniverse + ?Sized,
        B: RenderBackend + ?Sized,
        F: FnOnce(&mut ViewUpdate<'_, U, B>),
    {
        if !self.is_current(ticket) {
            log::debug!(
                "[Isolation] Dropping batch from epoch {} (current {})",
                ticket.0,
                self.epoch
            );
            return ApplyOutcome::Superseded;
        }

        let mut view = ViewUpdate {
            state: &mut self.state,
            universe,
            backend,
        };
        f(&mut view);
        view.backend.commit();
        ApplyOutcome::Applied
    }

    /// Authoritative reset: invalidates outstanding tickets, shows everything,
    /// then applies `f` in the same batch
    ///
    /// Returns the ticket of the new epoch.
    pub fn reset<U, B, F>(&mut self, universe: &U, backend: &mut B, f: F) -> ViewTicket
    where
        U: ElementUniverse + ?Sized,
        B: RenderBackend + ?Sized,
        F: FnOnce(&mut ViewUpdate<'_, U, B>),
    {
        self.epoch += 1;
        let ticket = self.ticket();
        self.update(ticket, universe, backend, |view| {
            view.show_all();
            f(view);
        });
        ticket
    }

    /// Isolate in a batch of its own
    pub fn isolate<U, B>(&mut self, targets: &ElementSet, universe: &U, backend: &mut B)
    where
        U: ElementUniverse + ?Sized,
        B: RenderBackend + ?Sized,
    {
        let ticket = self.ticket();
        self.update(ticket, universe, backend, |view| view.isolate(targets));
    }

    /// Highlight in a batch of its own
    pub fn highlight<U, B>(
        &mut self,
        targets: &ElementSet,
        style: &HighlightStyle,
        universe: &U,
        backend: &mut B,
    ) where
        U: ElementUniverse + ?Sized,
        B: RenderBackend + ?Sized,
    {
        let ticket = self.ticket();
        self.update(ticket, universe, backend, |view| view.highlight(targets, style));
    }

    /// Clear highlights in a batch of their own
    pub fn clear_highlight<U, B>(&mut self, universe: &U, backend: &mut B)
    where
        U: ElementUniverse + ?Sized,
        B: RenderBackend + ?Sized,
    {
        let ticket = self.ticket();
        self.update(ticket, universe, backend, |view| view.clear_highlight());
    }

    /// Show everything; this is a reset and invalidates outstanding tickets
    pub fn show_all<U, B>(&mut self, universe: &U, backend: &mut B) -> ViewTicket
    where
        U: ElementUniverse + ?Sized,
        B: RenderBackend + ?Sized,
    {
        self.reset(universe, backend, |_| {})
    }

    /// Drop the state of an unloaded model
    pub fn forget_model(&mut self, model: &ModelId) {
        self.state.models.remove(model);
    }

    /// Check if an element is currently shown
    pub fn is_visible(&self, element: &ElementRef) -> bool {
        self.state.models.get(&element.model).map_or(true, |view| {
            view.visible && !view.hidden.contains(&element.element)
        })
    }

    pub fn is_model_visible(&self, model: &ModelId) -> bool {
        self.state.models.get(model).map_or(true, |view| view.visible)
    }

    pub fn is_highlighted(&self, element: &ElementRef) -> bool {
        self.state
            .models
            .get(&element.model)
            .is_some_and(|view| view.highlighted.contains(&element.element))
    }

    /// Style of the current highlight, if any
    pub fn highlight_style(&self) -> Option<&HighlightStyle> {
        self.state.highlight_style.as_ref()
    }

    /// Check if the last visibility change was an isolate
    pub fn is_isolating(&self) -> bool {
        self.state.isolating
    }

    /// Visible elements of the universe
    pub fn visible_elements<U: ElementUniverse + ?Sized>(&self, universe: &U) -> ElementSet {
        let mut visible = ElementSet::new();
        for model in universe.model_ids() {
            if !self.is_model_visible(&model) {
                continue;
            }
            let Some(all) = universe.model_elements(&model) else {
                continue;
            };
            let hidden = self.state.models.get(&model).map(|view| &view.hidden);
            visible.insert_many(
                &model,
                all.iter()
                    .copied()
                    .filter(|id| hidden.map_or(true, |h| !h.contains(id))),
            );
        }
        visible
    }

    /// Models with at least one visible element
    pub fn visible_models<U: ElementUniverse + ?Sized>(&self, universe: &U) -> Vec<ModelId> {
        let visible = self.visible_elements(universe);
        let mut models: Vec<ModelId> = visible.models().cloned().collect();
        models.sort();
        models
    }
}

/// Sorted target IDs of one model that the universe knows about
fn known_targets(
    targets: &ElementSet,
    model: &ModelId,
    all: &FxHashSet<ElementId>,
    action: &str,
) -> Vec<ElementId> {
    let Some(ids) = targets.elements_of(model) else {
        return Vec::new();
    };
    let mut known = Vec::with_capacity(ids.len());
    for id in ids {
        if all.contains(id) {
            known.push(*id);
        } else {
            log::warn!("[Isolation] Skipping unknown element {}{} in {}", model, id, action);
        }
    }
    known.sort_unstable();
    known
}

fn warn_unknown_models<U: ElementUniverse + ?Sized>(
    targets: &ElementSet,
    universe: &U,
    action: &str,
) {
    for model in targets.models() {
        if !universe.has_model(model) {
            log::warn!("[Isolation] Skipping unknown model {} in {}", model, action);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{CommandRecorder, RenderCommand};

    /// Minimal universe over a fixed set of elements
    struct Universe(FxHashMap<ModelId, FxHashSet<ElementId>>);

    impl Universe {
        fn new(models: &[(&str, &[u32])]) -> Self {
            Self(
                models
                    .iter()
                    .map(|(m, ids)| {
                        (ModelId::from(*m), ids.iter().map(|id| ElementId(*id)).collect())
                    })
                    .collect(),
            )
        }
    }

    impl ElementUniverse for Universe {
        fn model_ids(&self) -> Vec<ModelId> {
            let mut ids: Vec<ModelId> = self.0.keys().cloned().collect();
            ids.sort();
            ids
        }

        fn model_elements(&self, model: &ModelId) -> Option<&FxHashSet<ElementId>> {
            self.0.get(model)
        }
    }

    fn set(refs: &[(&str, u32)]) -> ElementSet {
        refs.iter().map(|(m, id)| ElementRef::new(*m, *id)).collect()
    }

    fn r(model: &str, id: u32) -> ElementRef {
        ElementRef::new(model, id)
    }

    #[test]
    fn test_isolate_subset() {
        let universe = Universe::new(&[("M1", &[1, 2, 3, 4])]);
        let mut ctl = IsolationController::new();
        let mut rec = CommandRecorder::new();

        ctl.isolate(&set(&[("M1", 1), ("M1", 3)]), &universe, &mut rec);

        assert!(ctl.is_visible(&r("M1", 1)));
        assert!(ctl.is_visible(&r("M1", 3)));
        assert!(!ctl.is_visible(&r("M1", 2)));
        assert!(!ctl.is_visible(&r("M1", 4)));
        assert!(ctl.is_model_visible(&ModelId::from("M1")));
        assert!(ctl.is_isolating());

        let model = ModelId::from("M1");
        assert_eq!(
            rec.commands(),
            [
                RenderCommand::SetModelVisible {
                    model: model.clone(),
                    visible: true
                },
                RenderCommand::SetElementsVisible {
                    model: model.clone(),
                    elements: vec![ElementId(2), ElementId(4)],
                    visible: false
                },
                RenderCommand::SetElementsVisible {
                    model,
                    elements: vec![ElementId(1), ElementId(3)],
                    visible: true
                },
                RenderCommand::Commit,
            ]
        );
    }

    #[test]
    fn test_models_without_targets_are_hidden() {
        let universe = Universe::new(&[("A", &[1, 2]), ("B", &[1, 2])]);
        let mut ctl = IsolationController::new();
        let mut rec = CommandRecorder::new();

        ctl.isolate(&set(&[("A", 2)]), &universe, &mut rec);

        assert!(!ctl.is_model_visible(&ModelId::from("B")));
        assert!(!ctl.is_visible(&r("B", 1)));
        assert!(ctl.is_visible(&r("A", 2)));
        assert_eq!(ctl.visible_elements(&universe), set(&[("A", 2)]));
        assert_eq!(ctl.visible_models(&universe), [ModelId::from("A")]);
    }

    #[test]
    fn test_isolate_empty_hides_everything() {
        let universe = Universe::new(&[("A", &[1, 2]), ("B", &[3])]);
        let mut ctl = IsolationController::new();
        let mut rec = CommandRecorder::new();

        ctl.isolate(&ElementSet::new(), &universe, &mut rec);

        assert!(ctl.visible_elements(&universe).is_empty());
        assert!(!ctl.is_model_visible(&ModelId::from("A")));
        assert!(!ctl.is_model_visible(&ModelId::from("B")));
    }

    #[test]
    fn test_isolate_everything_matches_show_all() {
        let universe = Universe::new(&[("A", &[1, 2]), ("B", &[3])]);
        let all = set(&[("A", 1), ("A", 2), ("B", 3)]);

        let mut isolated = IsolationController::new();
        isolated.isolate(&all, &universe, &mut CommandRecorder::new());

        let mut shown = IsolationController::new();
        shown.show_all(&universe, &mut CommandRecorder::new());

        assert_eq!(
            isolated.visible_elements(&universe),
            shown.visible_elements(&universe)
        );
        assert_eq!(shown.visible_elements(&universe), all);
    }

    #[test]
    fn test_show_all_restores_and_clears_highlight() {
        let universe = Universe::new(&[("M1", &[1, 2, 3])]);
        let mut ctl = IsolationController::new();
        let mut rec = CommandRecorder::new();

        ctl.isolate(&set(&[("M1", 1)]), &universe, &mut rec);
        ctl.highlight(
            &set(&[("M1", 1)]),
            &HighlightStyle::selection(),
            &universe,
            &mut rec,
        );
        assert!(ctl.is_highlighted(&r("M1", 1)));

        ctl.show_all(&universe, &mut rec);

        assert!(ctl.is_visible(&r("M1", 2)));
        assert!(!ctl.is_highlighted(&r("M1", 1)));
        assert!(ctl.highlight_style().is_none());
        assert!(!ctl.is_isolating());
    }

    #[test]
    fn test_exactly_one_commit_per_batch() {
        let universe = Universe::new(&[("A", &[1, 2]), ("B", &[3, 4])]);
        let mut ctl = IsolationController::new();
        let mut rec = CommandRecorder::new();

        let ticket = ctl.ticket();
        let outcome = ctl.update(ticket, &universe, &mut rec, |view| {
            view.isolate(&set(&[("A", 1), ("B", 4)]));
            view.highlight(&set(&[("B", 4)]), &HighlightStyle::room_overview());
        });

        assert_eq!(outcome, ApplyOutcome::Applied);
        assert_eq!(rec.commit_count(), 1);
        assert_eq!(rec.commands().last(), Some(&RenderCommand::Commit));

        rec.drain();
        ctl.show_all(&universe, &mut rec);
        assert_eq!(rec.commit_count(), 1);
    }

    #[test]
    fn test_reset_supersedes_pending_batch() {
        let universe = Universe::new(&[("M1", &[1, 2])]);
        let mut ctl = IsolationController::new();
        let mut rec = CommandRecorder::new();

        let pending = ctl.ticket();
        ctl.show_all(&universe, &mut rec);
        rec.drain();

        let outcome = ctl.update(pending, &universe, &mut rec, |view| {
            view.isolate(&set(&[("M1", 1)]));
        });

        assert_eq!(outcome, ApplyOutcome::Superseded);
        assert!(rec.is_empty());
        assert!(ctl.is_visible(&r("M1", 2)));
        assert!(!ctl.is_current(pending));
    }

    #[test]
    fn test_reset_applies_follow_up_in_same_batch() {
        let universe = Universe::new(&[("M1", &[1, 2])]);
        let mut ctl = IsolationController::new();
        let mut rec = CommandRecorder::new();

        let ticket = ctl.reset(&universe, &mut rec, |view| {
            view.isolate(&set(&[("M1", 2)]));
        });

        assert!(ctl.is_current(ticket));
        assert_eq!(ticket.epoch(), 1);
        assert_eq!(rec.commit_count(), 1);
        assert!(!ctl.is_visible(&r("M1", 1)));
        assert!(ctl.is_visible(&r("M1", 2)));
    }

    #[test]
    fn test_stale_refs_are_skipped() {
        let universe = Universe::new(&[("M1", &[1, 2])]);
        let mut ctl = IsolationController::new();
        let mut rec = CommandRecorder::new();

        ctl.isolate(
            &set(&[("M1", 1), ("M1", 99), ("Gone", 1)]),
            &universe,
            &mut rec,
        );

        assert!(ctl.is_visible(&r("M1", 1)));
        assert!(!ctl.is_visible(&r("M1", 2)));
        for command in rec.commands() {
            if let RenderCommand::SetElementsVisible { model, elements, .. } = command {
                assert_eq!(model.as_str(), "M1");
                assert!(!elements.contains(&ElementId(99)));
            }
        }
    }

    #[test]
    fn test_highlight_replaces_previous() {
        let universe = Universe::new(&[("A", &[1, 2]), ("B", &[3])]);
        let mut ctl = IsolationController::new();
        let mut rec = CommandRecorder::new();

        ctl.highlight(&set(&[("A", 1)]), &HighlightStyle::selection(), &universe, &mut rec);
        rec.drain();
        ctl.highlight(
            &set(&[("B", 3)]),
            &HighlightStyle::room_overview(),
            &universe,
            &mut rec,
        );

        assert!(!ctl.is_highlighted(&r("A", 1)));
        assert!(ctl.is_highlighted(&r("B", 3)));
        assert_eq!(ctl.highlight_style(), Some(&HighlightStyle::room_overview()));
        assert_eq!(
            rec.commands()[0],
            RenderCommand::ResetHighlight {
                model: ModelId::from("A")
            }
        );
        // visibility untouched
        assert!(ctl.is_visible(&r("A", 2)));
    }

    #[test]
    fn test_clear_highlight() {
        let universe = Universe::new(&[("A", &[1])]);
        let mut ctl = IsolationController::new();
        let mut rec = CommandRecorder::new();

        ctl.highlight(&set(&[("A", 1)]), &HighlightStyle::selection(), &universe, &mut rec);
        ctl.clear_highlight(&universe, &mut rec);

        assert!(!ctl.is_highlighted(&r("A", 1)));
        assert!(ctl.highlight_style().is_none());
        assert_eq!(rec.commit_count(), 2);
    }

    #[test]
    fn test_isolate_is_a_snapshot() {
        let mut universe = Universe::new(&[("M", &[1, 2])]);
        let mut ctl = IsolationController::new();
        ctl.isolate(&set(&[("M", 1)]), &universe, &mut CommandRecorder::new());

        // streamed in after the isolate
        if let Some(ids) = universe.0.get_mut(&ModelId::from("M")) {
            ids.insert(ElementId(3));
        }
        universe
            .0
            .insert(ModelId::from("N"), std::iter::once(ElementId(1)).collect());

        assert!(ctl.is_isolating());
        assert!(!ctl.is_visible(&r("M", 2)));
        assert!(ctl.is_visible(&r("M", 3)));
        assert!(ctl.is_visible(&r("N", 1)));

        // the next isolate picks them up
        ctl.isolate(&set(&[("M", 1)]), &universe, &mut CommandRecorder::new());
        assert!(!ctl.is_visible(&r("M", 3)));
        assert!(!ctl.is_model_visible(&ModelId::from("N")));
    }

    #[test]
    fn test_forget_model() {
        let universe = Universe::new(&[("A", &[1]), ("B", &[2])]);
        let mut ctl = IsolationController::new();
        ctl.isolate(&set(&[("A", 1)]), &universe, &mut CommandRecorder::new());
        assert!(!ctl.is_model_visible(&ModelId::from("B")));

        ctl.forget_model(&ModelId::from("B"));
        assert!(ctl.is_model_visible(&ModelId::from("B")));
    }
}
