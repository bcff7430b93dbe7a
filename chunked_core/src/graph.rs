// Copyright 2025 the VizIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The scene-graph binding contract.

use alloc::vec::Vec;

use crate::element::{Element, Geometry, Presentation};
use crate::key::ElementKey;
use crate::transition::Transition;

/// A keyed element registry the line renderer reconciles against.
///
/// The renderer never caches element state itself. Everything it needs from a previous render
/// (whether a series was drawn before, where clip rectangles currently are, which markers exist)
/// is read back through this trait, and it must observe the *currently displayed* value of an
/// element, including values that are halfway through a transition.
///
/// Hosts are free to run transitions however they like; [`crate::Scene`] is a retained
/// implementation with an explicit clock.
pub trait SceneGraph {
    /// Returns the element for `key` as currently displayed.
    fn element(&self, key: &ElementKey) -> Option<Element>;

    /// Returns `true` if an element exists for `key` (including one that is exiting).
    fn contains(&self, key: &ElementKey) -> bool {
        self.element(key).is_some()
    }

    /// Returns every key, in paint order (first painted first).
    fn keys(&self) -> Vec<ElementKey>;

    /// Creates an element. Replaces any existing element with the same key.
    fn insert(&mut self, key: ElementKey, element: Element);

    /// Replaces the presentation of an existing element.
    fn set_presentation(&mut self, key: &ElementKey, presentation: Presentation);

    /// Moves an existing element to `geometry`, immediately or over `transition`.
    ///
    /// An animated change starts from the currently displayed geometry and supersedes any
    /// change already in flight. Updating an exiting element cancels its removal.
    fn set_geometry(
        &mut self,
        key: &ElementKey,
        geometry: Geometry,
        transition: Option<&Transition>,
    );

    /// Removes an element, optionally animating it to `exit` geometry first.
    fn remove(&mut self, key: &ElementKey, exit: Option<(Geometry, &Transition)>);

    /// Moves an element to the top of paint order.
    fn raise(&mut self, key: &ElementKey);
}
