//! Suppress differences that annotated types declare as harmless
//!
//! - `NoExtend` classes: protected members may change, nobody subclasses them
//! - `NoImplement` interfaces: methods may be added
//! - `NoInstantiate` classes: public constructors may change

use std::collections::HashMap;
use std::sync::Arc;

use super::difference::{codes, Difference};
use super::hierarchy::{carries_annotation, TypeHierarchy};
use crate::shared::models::{Element, ElementKind, TypeKind, Visibility};

pub const NO_EXTEND_ID: &str = "mule.revapi.api.ignoreNoExtend";
pub const NO_IMPLEMENT_ID: &str = "mule.revapi.api.ignoreNoImplement";
pub const NO_INSTANTIATE_ID: &str = "mule.revapi.api.ignoreNoInstantiate";

pub const NO_EXTEND: &str = "org.mule.api.annotation.NoExtend";
pub const NO_IMPLEMENT: &str = "org.mule.api.annotation.NoImplement";
pub const NO_INSTANTIATE: &str = "org.mule.api.annotation.NoInstantiate";

const CLASS_KINDS: &[TypeKind] = &[TypeKind::Class, TypeKind::Enum];
const INTERFACE_KINDS: &[TypeKind] = &[TypeKind::Interface];

/// Post-filter over engine differences
pub trait DifferenceTransform<E: Element + ?Sized>: Send + Sync {
    fn id(&self) -> &str;

    /// Codes this transform looks at; others pass through untouched
    fn difference_codes(&self) -> Vec<&str>;

    /// `None` suppresses the difference
    fn transform(&self, old: Option<&E>, new: Option<&E>, difference: Difference) -> Option<Difference>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Side {
    Old,
    New,
}

/// What the checked element must be
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Subject {
    ProtectedField,
    /// Methods and constructors
    ProtectedMethod,
    ProtectedConstructor,
    PublicConstructor,
    Any,
}

impl Subject {
    fn matches<E: Element + ?Sized>(self, element: &E) -> bool {
        let kind = element.kind();
        let visibility = element.visibility();
        match self {
            Subject::ProtectedField => kind == ElementKind::Field && visibility == Visibility::Protected,
            Subject::ProtectedMethod => {
                matches!(kind, ElementKind::Method | ElementKind::Constructor)
                    && visibility == Visibility::Protected
            }
            Subject::ProtectedConstructor => {
                kind == ElementKind::Constructor && visibility == Visibility::Protected
            }
            Subject::PublicConstructor => {
                kind == ElementKind::Constructor && visibility == Visibility::Public
            }
            Subject::Any => true,
        }
    }
}

/// Suppression rule for one difference code
#[derive(Debug, Clone, Copy)]
struct CheckRule {
    side: Side,
    /// Check the parent of the reported element (parameter changes)
    via_parent: bool,
    subject: Subject,
}

impl CheckRule {
    const fn on_old(subject: Subject) -> Self {
        Self {
            side: Side::Old,
            via_parent: false,
            subject,
        }
    }

    const fn on_new(subject: Subject) -> Self {
        Self {
            side: Side::New,
            via_parent: false,
            subject,
        }
    }

    const fn on_old_parent(subject: Subject) -> Self {
        Self {
            side: Side::Old,
            via_parent: true,
            subject,
        }
    }
}

/// Annotation-driven transform; build with [`AnnotationTransform::no_extend`],
/// [`AnnotationTransform::no_implement`] or [`AnnotationTransform::no_instantiate`]
pub struct AnnotationTransform {
    id: &'static str,
    annotation: &'static str,
    accepted_kinds: &'static [TypeKind],
    rules: HashMap<&'static str, CheckRule>,
    hierarchy: Arc<dyn TypeHierarchy>,
}

impl AnnotationTransform {
    pub fn no_extend(hierarchy: Arc<dyn TypeHierarchy>) -> Self {
        let field = CheckRule::on_old(Subject::ProtectedField);
        let method = CheckRule::on_old(Subject::ProtectedMethod);
        let rules = HashMap::from([
            (codes::FIELD_REMOVED, field),
            (codes::FIELD_TYPE_CHANGED, field),
            (codes::METHOD_REMOVED, method),
            (codes::METHOD_NUMBER_OF_PARAMETERS_CHANGED, method),
            (codes::METHOD_RETURN_TYPE_CHANGED, method),
            (codes::METHOD_ADDED, CheckRule::on_new(Subject::ProtectedConstructor)),
            (
                codes::METHOD_PARAMETER_TYPE_CHANGED,
                CheckRule::on_old_parent(Subject::ProtectedMethod),
            ),
        ]);
        Self {
            id: NO_EXTEND_ID,
            annotation: NO_EXTEND,
            accepted_kinds: CLASS_KINDS,
            rules,
            hierarchy,
        }
    }

    pub fn no_implement(hierarchy: Arc<dyn TypeHierarchy>) -> Self {
        Self {
            id: NO_IMPLEMENT_ID,
            annotation: NO_IMPLEMENT,
            accepted_kinds: INTERFACE_KINDS,
            rules: HashMap::from([(codes::METHOD_ADDED_TO_INTERFACE, CheckRule::on_new(Subject::Any))]),
            hierarchy,
        }
    }

    pub fn no_instantiate(hierarchy: Arc<dyn TypeHierarchy>) -> Self {
        let constructor = CheckRule::on_old(Subject::PublicConstructor);
        let rules = HashMap::from([
            (codes::METHOD_REMOVED, constructor),
            (codes::METHOD_NUMBER_OF_PARAMETERS_CHANGED, constructor),
            (codes::METHOD_ADDED, CheckRule::on_new(Subject::PublicConstructor)),
            (
                codes::METHOD_PARAMETER_TYPE_CHANGED,
                CheckRule::on_old_parent(Subject::PublicConstructor),
            ),
        ]);
        Self {
            id: NO_INSTANTIATE_ID,
            annotation: NO_INSTANTIATE,
            accepted_kinds: CLASS_KINDS,
            rules,
            hierarchy,
        }
    }

    pub fn annotation(&self) -> &str {
        self.annotation
    }

    fn ignores<E: Element + ?Sized>(&self, rule: CheckRule, old: Option<&E>, new: Option<&E>) -> bool {
        let reported = match rule.side {
            Side::Old => old,
            Side::New => new,
        };
        let subject = match (reported, rule.via_parent) {
            (Some(element), false) => element,
            (Some(element), true) => match element.parent() {
                Some(parent) => parent,
                None => return false,
            },
            (None, _) => return false,
        };
        if !rule.subject.matches(subject) {
            return false;
        }

        match subject.parent() {
            Some(owner) if owner.is_declared_type() => carries_annotation(
                self.hierarchy.as_ref(),
                owner.canonical_name(),
                self.annotation,
                self.accepted_kinds,
            ),
            _ => false,
        }
    }
}

impl<E: Element + ?Sized> DifferenceTransform<E> for AnnotationTransform {
    fn id(&self) -> &str {
        self.id
    }

    fn difference_codes(&self) -> Vec<&str> {
        let mut codes: Vec<&str> = self.rules.keys().copied().collect();
        codes.sort_unstable();
        codes
    }

    fn transform(&self, old: Option<&E>, new: Option<&E>, difference: Difference) -> Option<Difference> {
        let Some(rule) = self.rules.get(difference.code.as_str()) else {
            return Some(difference);
        };
        if self.ignores(*rule, old, new) {
            tracing::debug!(transform = self.id, difference = %difference, "Difference ignored");
            return None;
        }
        Some(difference)
    }
}

impl std::fmt::Debug for AnnotationTransform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnnotationTransform")
            .field("id", &self.id)
            .field("annotation", &self.annotation)
            .finish()
    }
}

/// The three annotation transforms sharing one hierarchy
pub fn default_transforms(hierarchy: Arc<dyn TypeHierarchy>) -> Vec<AnnotationTransform> {
    vec![
        AnnotationTransform::no_extend(Arc::clone(&hierarchy)),
        AnnotationTransform::no_implement(Arc::clone(&hierarchy)),
        AnnotationTransform::no_instantiate(hierarchy),
    ]
}

/// Run a difference through every transform until one suppresses it
pub fn apply_transforms<E, T>(
    transforms: &[T],
    old: Option<&E>,
    new: Option<&E>,
    difference: Difference,
) -> Option<Difference>
where
    E: Element + ?Sized,
    T: DifferenceTransform<E>,
{
    transforms
        .iter()
        .try_fold(difference, |difference, transform| transform.transform(old, new, difference))
}
