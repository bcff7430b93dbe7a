// Copyright 2025 the VizIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A retained [`SceneGraph`] with a caller-driven clock.

use alloc::boxed::Box;
use alloc::vec::Vec;
use core::time::Duration;

use hashbrown::HashMap;

use crate::element::{Element, Geometry, Presentation};
use crate::graph::SceneGraph;
use crate::interpolate::{PathInterpolator, VertexLerp, interpolate_geometry};
use crate::key::ElementKey;
use crate::transition::Transition;

#[derive(Debug)]
struct Tween {
    from: Geometry,
    scheduled: Duration,
    transition: Transition,
}

impl Tween {
    fn end(&self) -> Duration {
        self.scheduled + self.transition.end()
    }
}

#[derive(Debug)]
struct Node {
    /// Target geometry; equal to the displayed geometry once `tween` is done.
    geometry: Geometry,
    presentation: Presentation,
    tween: Option<Tween>,
    exit_at: Option<Duration>,
    seq: u64,
}

/// An in-memory element registry that runs transitions against an explicit clock.
///
/// Time only moves when the caller says so ([`Scene::advance_to`], [`Scene::advance_by`],
/// [`Scene::finish`]). Every animated change is recorded relative to [`Scene::now`] at the time
/// it was scheduled, and [`SceneGraph::element`] samples it at the current time, so a render
/// issued mid-transition reads back the in-flight value.
#[derive(Debug)]
pub struct Scene {
    nodes: HashMap<ElementKey, Node>,
    now: Duration,
    next_seq: u64,
    paths: Box<dyn PathInterpolator>,
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

impl Scene {
    /// Creates an empty scene at time zero, morphing paths with [`VertexLerp`].
    pub fn new() -> Self {
        Self::with_path_interpolator(Box::new(VertexLerp))
    }

    /// Creates an empty scene with a custom path interpolator.
    pub fn with_path_interpolator(paths: Box<dyn PathInterpolator>) -> Self {
        Self {
            nodes: HashMap::new(),
            now: Duration::ZERO,
            next_seq: 0,
            paths,
        }
    }

    /// Current scene time.
    pub fn now(&self) -> Duration {
        self.now
    }

    /// Number of elements, exiting ones included.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns `true` if the scene has no elements.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Moves the clock forward to `now`, settling finished transitions and dropping elements
    /// whose exit has completed. Moving backwards is ignored.
    pub fn advance_to(&mut self, now: Duration) {
        if now < self.now {
            return;
        }
        self.now = now;
        self.nodes.retain(|_, node| node.exit_at.is_none_or(|at| at > now));
        for node in self.nodes.values_mut() {
            if node.tween.as_ref().is_some_and(|t| t.end() <= now) {
                node.tween = None;
            }
        }
    }

    /// Moves the clock forward by `dt`.
    pub fn advance_by(&mut self, dt: Duration) {
        self.advance_to(self.now + dt);
    }

    /// Advances until every scheduled transition and exit has completed.
    pub fn finish(&mut self) {
        let end = self
            .nodes
            .values()
            .flat_map(|n| n.tween.as_ref().map(Tween::end).into_iter().chain(n.exit_at))
            .max()
            .unwrap_or(self.now);
        self.advance_to(end);
        tracing::trace!(elements = self.nodes.len(), "scene settled");
    }

    /// Returns `true` while any transition or exit is still running.
    pub fn is_animating(&self) -> bool {
        self.nodes
            .values()
            .any(|n| n.tween.is_some() || n.exit_at.is_some())
    }

    /// Returns every element as currently displayed, in paint order.
    pub fn paint_order(&self) -> Vec<(ElementKey, Element)> {
        self.keys()
            .into_iter()
            .filter_map(|key| {
                let element = self.element(&key)?;
                Some((key, element))
            })
            .collect()
    }

    fn sample(&self, node: &Node) -> Geometry {
        match &node.tween {
            Some(tween) => {
                let elapsed = self.now.saturating_sub(tween.scheduled);
                let t = tween.transition.progress(elapsed);
                interpolate_geometry(&tween.from, &node.geometry, t, &*self.paths)
            }
            None => node.geometry.clone(),
        }
    }

    fn bump_seq(&mut self) -> u64 {
        let seq = self.next_seq;
        self.next_seq += 1;
        seq
    }
}

impl SceneGraph for Scene {
    fn element(&self, key: &ElementKey) -> Option<Element> {
        let node = self.nodes.get(key)?;
        Some(Element {
            geometry: self.sample(node),
            presentation: node.presentation.clone(),
        })
    }

    fn contains(&self, key: &ElementKey) -> bool {
        self.nodes.contains_key(key)
    }

    fn keys(&self) -> Vec<ElementKey> {
        let mut keys: Vec<(u64, &ElementKey)> =
            self.nodes.iter().map(|(k, n)| (n.seq, k)).collect();
        keys.sort_by_key(|(seq, _)| *seq);
        keys.into_iter().map(|(_, k)| k.clone()).collect()
    }

    fn insert(&mut self, key: ElementKey, element: Element) {
        let seq = self.bump_seq();
        self.nodes.insert(
            key,
            Node {
                geometry: element.geometry,
                presentation: element.presentation,
                tween: None,
                exit_at: None,
                seq,
            },
        );
    }

    fn set_presentation(&mut self, key: &ElementKey, presentation: Presentation) {
        if let Some(node) = self.nodes.get_mut(key) {
            node.presentation = presentation;
        }
    }

    fn set_geometry(
        &mut self,
        key: &ElementKey,
        geometry: Geometry,
        transition: Option<&Transition>,
    ) {
        let Some(node) = self.nodes.get(key) else {
            tracing::trace!(?key, "set_geometry on a missing element");
            return;
        };
        let tween = transition.map(|transition| Tween {
            from: self.sample(node),
            scheduled: self.now,
            transition: *transition,
        });
        if let Some(node) = self.nodes.get_mut(key) {
            node.geometry = geometry;
            node.tween = tween;
            node.exit_at = None;
        }
    }

    fn remove(&mut self, key: &ElementKey, exit: Option<(Geometry, &Transition)>) {
        match exit {
            None => {
                self.nodes.remove(key);
            }
            Some((geometry, transition)) => {
                self.set_geometry(key, geometry, Some(transition));
                let at = self.now + transition.end();
                if let Some(node) = self.nodes.get_mut(key) {
                    node.exit_at = Some(at);
                }
            }
        }
    }

    fn raise(&mut self, key: &ElementKey) {
        let seq = self.bump_seq();
        if let Some(node) = self.nodes.get_mut(key) {
            node.seq = seq;
        }
    }
}
