//! Candidate endpoint catalog.
//!
//! The backend's route naming is not stable across deployments, so both
//! resolvers probe an ordered list of plausible shapes. All of them are
//! produced here; nothing else in the crate formats a path.

use recon_core::ResourceKind;

/// Whether an endpoint lists only the parent's children or everything.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    Parent,
    Generic,
}

/// One concrete endpoint to probe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndpointTemplate {
    /// Shape the path was built from, for diagnostics.
    pub pattern: &'static str,
    pub path: String,
    pub scope: Scope,
}

impl EndpointTemplate {
    #[must_use]
    pub fn new(pattern: &'static str, path: String, scope: Scope) -> Self {
        Self {
            pattern,
            path,
            scope,
        }
    }
}

/// Source of every path the resolvers request.
///
/// Implementations must return the same list for the same input; resolvers
/// call [`templates`](Self::templates) once per run.
pub trait EndpointCatalog: Send + Sync {
    /// Listing endpoints for the identifier sweep: parent-scoped first, then
    /// generic.
    fn templates(&self, kind: ResourceKind, parent_id: i64) -> Vec<EndpointTemplate>;

    /// Generic listing used by the last-resort lookup.
    fn listing(&self, kind: ResourceKind) -> EndpointTemplate;

    /// Endpoint that triggers artifact generation.
    fn generation(&self, kind: ResourceKind, id: i64) -> EndpointTemplate;

    /// Read-only endpoints that may already know the artifact URL.
    fn artifact_probes(&self, kind: ResourceKind, id: i64) -> Vec<EndpointTemplate>;

    /// Full record.
    fn detail(&self, kind: ResourceKind, id: i64) -> EndpointTemplate;

    /// Generic update endpoint the artifact URL is persisted through.
    fn update(&self, kind: ResourceKind) -> EndpointTemplate;
}

/// The route shapes observed across backend deployments.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultCatalog;

impl EndpointCatalog for DefaultCatalog {
    fn templates(&self, kind: ResourceKind, parent_id: i64) -> Vec<EndpointTemplate> {
        let upper = kind.resource();
        let lower = lower_first(upper);
        let parent = kind.parent();
        let parent_lower = lower_first(parent);

        let mut out = Vec::with_capacity(11);
        for resource in [upper, lower.as_str()] {
            out.push(EndpointTemplate::new(
                "/{Resource}/getBy{Parent}/{parentId}",
                format!("/{resource}/getBy{parent}/{parent_id}"),
                Scope::Parent,
            ));
            out.push(EndpointTemplate::new(
                "/{Resource}/by-{parent}/{parentId}",
                format!("/{resource}/by-{parent_lower}/{parent_id}"),
                Scope::Parent,
            ));
            out.push(EndpointTemplate::new(
                "/{Resource}?{Parent}Id={parentId}",
                format!("/{resource}?{parent}Id={parent_id}"),
                Scope::Parent,
            ));
            out.push(EndpointTemplate::new(
                "/{Resource}?{parent}Id={parentId}",
                format!("/{resource}?{parent_lower}Id={parent_id}"),
                Scope::Parent,
            ));
        }
        out.push(self.listing(kind));
        out.push(EndpointTemplate::new(
            "/{Resource}/List",
            format!("/{upper}/List"),
            Scope::Generic,
        ));
        out.push(EndpointTemplate::new(
            "/{Resource}/GetAll",
            format!("/{upper}/GetAll"),
            Scope::Generic,
        ));
        out
    }

    fn listing(&self, kind: ResourceKind) -> EndpointTemplate {
        EndpointTemplate::new("/{Resource}", format!("/{}", kind.resource()), Scope::Generic)
    }

    fn generation(&self, kind: ResourceKind, id: i64) -> EndpointTemplate {
        EndpointTemplate::new(
            "/{Resource}/{id}/generate-{artifact}",
            format!("/{}/{id}/generate-{}", kind.resource(), kind.artifact()),
            Scope::Generic,
        )
    }

    fn artifact_probes(&self, kind: ResourceKind, id: i64) -> Vec<EndpointTemplate> {
        let resource = kind.resource();
        let artifact = kind.artifact();
        let artifact_title = upper_first(artifact);
        vec![
            EndpointTemplate::new(
                "/{Resource}/get{Artifact}Url/{id}",
                format!("/{resource}/get{artifact_title}Url/{id}"),
                Scope::Generic,
            ),
            EndpointTemplate::new(
                "/{Resource}/{artifact}-url/{id}",
                format!("/{resource}/{artifact}-url/{id}"),
                Scope::Generic,
            ),
            EndpointTemplate::new(
                "/{Resource}/getUrl/{id}",
                format!("/{resource}/getUrl/{id}"),
                Scope::Generic,
            ),
            EndpointTemplate::new(
                "/{Resource}/Get{Artifact}/{id}",
                format!("/{resource}/Get{artifact_title}/{id}"),
                Scope::Generic,
            ),
        ]
    }

    fn detail(&self, kind: ResourceKind, id: i64) -> EndpointTemplate {
        EndpointTemplate::new(
            "/{Resource}/{id}",
            format!("/{}/{id}", kind.resource()),
            Scope::Generic,
        )
    }

    fn update(&self, kind: ResourceKind) -> EndpointTemplate {
        EndpointTemplate::new(
            "/{Resource}/update",
            format!("/{}/update", kind.resource()),
            Scope::Generic,
        )
    }
}

fn lower_first(s: &str) -> String {
    let mut chars = s.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_lowercase().chain(chars).collect()
    })
}

fn upper_first(s: &str) -> String {
    let mut chars = s.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_uppercase().chain(chars).collect()
    })
}
