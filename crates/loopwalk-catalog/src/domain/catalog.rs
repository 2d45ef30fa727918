//! The read-only location catalog.

use std::collections::HashSet;

use loopwalk_core::error::DomainError;
use loopwalk_core::scene::SceneId;

use super::location::{ActionSpec, LocationDefinition, LocationId, Side};
use super::naming::{ChainStep, Choice, Scene, SceneNaming};

/// Deepest chain a catalog may declare.
pub const MAX_CHAIN_DEPTH: u32 = 16;

/// Ordered, immutable lookup of location definitions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Catalog {
    naming: SceneNaming,
    locations: Vec<LocationDefinition>,
    version_hash: Option<String>,
}

impl Catalog {
    /// Creates a catalog from ordered location definitions.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidCatalog` if there are no locations, a
    /// location number repeats, a location has no actions at all, a keyword
    /// or action id is blank, a chain depth is zero or above
    /// [`MAX_CHAIN_DEPTH`], or a prerequisite depends on its own side.
    pub fn new(
        naming: SceneNaming,
        locations: Vec<LocationDefinition>,
    ) -> Result<Self, DomainError> {
        if locations.is_empty() {
            return Err(DomainError::InvalidCatalog(
                "catalog must define at least one location".to_owned(),
            ));
        }

        let mut seen = HashSet::new();
        for location in &locations {
            if !seen.insert(location.id) {
                return Err(DomainError::InvalidCatalog(format!(
                    "location {} is defined more than once",
                    location.id
                )));
            }
            if location.total_actions() == 0 {
                return Err(DomainError::InvalidCatalog(format!(
                    "location {} has no actions",
                    location.id
                )));
            }
            for side in Side::ALL {
                validate_side(location, side)?;
            }
        }

        Ok(Self {
            naming,
            locations,
            version_hash: None,
        })
    }

    /// Records the hash of the source this catalog was ingested from.
    #[must_use]
    pub fn with_version_hash(mut self, version_hash: String) -> Self {
        self.version_hash = Some(version_hash);
        self
    }

    /// Returns the hash of the ingested source, if any.
    #[must_use]
    pub fn version_hash(&self) -> Option<&str> {
        self.version_hash.as_deref()
    }

    /// Returns the scene naming scheme.
    #[must_use]
    pub fn naming(&self) -> &SceneNaming {
        &self.naming
    }

    /// Returns every location in playthrough order.
    #[must_use]
    pub fn locations(&self) -> &[LocationDefinition] {
        &self.locations
    }

    /// Looks up a location.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::UnknownLocation` if the catalog has no such
    /// location.
    pub fn get(&self, id: LocationId) -> Result<&LocationDefinition, DomainError> {
        self.locations
            .iter()
            .find(|location| location.id == id)
            .ok_or(DomainError::UnknownLocation(id.0))
    }

    /// Returns the location a playthrough starts in.
    #[must_use]
    pub fn first(&self) -> LocationId {
        // Construction rejects empty catalogs.
        self.locations[0].id
    }

    /// Returns the location following `id`, or `None` after the last one.
    #[must_use]
    pub fn next_after(&self, id: LocationId) -> Option<LocationId> {
        let index = self.locations.iter().position(|l| l.id == id)?;
        self.locations.get(index + 1).map(|l| l.id)
    }

    /// Composes a scene identifier at `location`.
    #[must_use]
    pub fn scene_id(&self, location: LocationId, scene: &Scene<'_>) -> SceneId {
        self.naming.scene_id(location, scene)
    }

    /// Lists every scene `location` can request, without duplicates.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::UnknownLocation` if the catalog has no such
    /// location.
    pub fn scenes_for(&self, id: LocationId) -> Result<Vec<SceneId>, DomainError> {
        let location = self.get(id)?;
        let mut scenes = vec![
            self.scene_id(id, &Scene::Idle),
            self.scene_id(id, &Scene::Walk),
            self.scene_id(id, &Scene::Finale),
        ];

        for side in Side::ALL {
            let definition = location.side(side);
            let keyword = definition.keyword.as_str();
            scenes.push(self.scene_id(id, &Scene::Empty { keyword, side }));
            if let Some(prerequisite) = &definition.prerequisite {
                scenes.push(self.scene_id(
                    id,
                    &Scene::Fallback {
                        suffix: &prerequisite.fallback,
                    },
                ));
            }

            for action in &definition.actions {
                let action_id = action.id();
                match action {
                    ActionSpec::Simple { .. } => {
                        scenes.push(self.scene_id(
                            id,
                            &Scene::Action {
                                keyword,
                                side,
                                action_id,
                                chain_steps: &[],
                            },
                        ));
                        for choice in [Choice::A, Choice::B] {
                            scenes.push(self.scene_id(
                                id,
                                &Scene::Reaction {
                                    keyword,
                                    side,
                                    action_id,
                                    choice,
                                },
                            ));
                        }
                    }
                    ActionSpec::Chain { depth, .. } => {
                        let steps = vec![ChainStep::Advance; *depth as usize];
                        for reached in 0..=steps.len() {
                            scenes.push(self.scene_id(
                                id,
                                &Scene::Action {
                                    keyword,
                                    side,
                                    action_id,
                                    chain_steps: &steps[..reached],
                                },
                            ));
                        }
                    }
                }
            }
        }

        let mut unique = HashSet::new();
        scenes.retain(|scene| unique.insert(scene.clone()));
        Ok(scenes)
    }
}

fn validate_side(location: &LocationDefinition, side: Side) -> Result<(), DomainError> {
    let definition = location.side(side);
    if definition.keyword.trim().is_empty() {
        return Err(DomainError::InvalidCatalog(format!(
            "location {} side {side} has a blank keyword",
            location.id
        )));
    }

    for action in &definition.actions {
        if action.id().trim().is_empty() {
            return Err(DomainError::InvalidCatalog(format!(
                "location {} side {side} has an action with a blank id",
                location.id
            )));
        }
        match action.chain_depth() {
            Some(0) => {
                return Err(DomainError::InvalidCatalog(format!(
                    "location {} side {side} chain action {} has depth 0",
                    location.id,
                    action.id()
                )));
            }
            Some(depth) if depth > MAX_CHAIN_DEPTH => {
                return Err(DomainError::InvalidCatalog(format!(
                    "location {} side {side} chain action {} has depth {depth}, \
                     the maximum is {MAX_CHAIN_DEPTH}",
                    location.id,
                    action.id()
                )));
            }
            _ => {}
        }
    }

    if let Some(prerequisite) = &definition.prerequisite {
        if prerequisite.depends_on == side {
            return Err(DomainError::InvalidCatalog(format!(
                "location {} side {side} prerequisite depends on its own side",
                location.id
            )));
        }
        if prerequisite.fallback.trim().is_empty() {
            return Err(DomainError::InvalidCatalog(format!(
                "location {} side {side} prerequisite has a blank fallback",
                location.id
            )));
        }
    }

    Ok(())
}
