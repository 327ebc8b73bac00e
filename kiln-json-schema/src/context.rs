/*
░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░
╔═══════════════════════════════════════════════════════════════════════╗
║                                                                       ║
║                                Context                                  ║
║                                ¯¯¯¯¯¯¯                                  ║
╚═══════════════════════════════════════════════════════════════════════╝
░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░
*/
//! The evaluator's stack frame and the annotation pool that lets
//! `additionalProperties`/`unevaluatedProperties`/`unevaluatedItems` see what
//! sibling and in-place-applied keywords already covered.
//!
//! Dynamic-anchor resolution walks an explicit `Vec<String>` of base URIs
//! rather than a parent-pointer chain, avoiding self-referential lifetimes.

use std::collections::{BTreeSet, HashMap};

use kiln_core::Value;
use kiln_json_pointer::Pointer;

/// One keyword's annotation, merged across every place it was produced at
/// the same instance location.
#[derive(Debug, Clone)]
pub enum Annotation {
    /// `properties`/`patternProperties`/`additionalProperties`/
    /// `unevaluatedProperties`: the set of object member names covered.
    PropertyNames(BTreeSet<String>),
    /// `prefixItems`/`items`/`unevaluatedItems`: either an exact count of
    /// leading array elements covered, or "all of them".
    ItemCount(ItemCoverage),
    /// `contains`: the indices that matched, or "all of them".
    Indices(IndexCoverage),
}

/// `prefixItems`/`items`/`unevaluatedItems` coverage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemCoverage {
    Count(usize),
    All,
}

impl ItemCoverage {
    #[must_use]
    pub fn covers(self, index: usize) -> bool {
        match self {
            ItemCoverage::All => true,
            ItemCoverage::Count(n) => index < n,
        }
    }

    fn merge(self, other: ItemCoverage) -> ItemCoverage {
        match (self, other) {
            (ItemCoverage::All, _) | (_, ItemCoverage::All) => ItemCoverage::All,
            (ItemCoverage::Count(a), ItemCoverage::Count(b)) => ItemCoverage::Count(a.max(b)),
        }
    }

    /// The annotation value as it would be serialized: `true` for `All`,
    /// otherwise the count.
    #[must_use]
    pub fn to_value(self) -> Value {
        match self {
            ItemCoverage::All => Value::from(true),
            ItemCoverage::Count(n) => Value::from(n as i64),
        }
    }
}

/// `contains` coverage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IndexCoverage {
    Indices(BTreeSet<usize>),
    All,
}

impl IndexCoverage {
    #[must_use]
    pub fn covers(&self, index: usize) -> bool {
        match self {
            IndexCoverage::All => true,
            IndexCoverage::Indices(set) => set.contains(&index),
        }
    }

    fn merge(self, other: IndexCoverage) -> IndexCoverage {
        match (self, other) {
            (IndexCoverage::All, _) | (_, IndexCoverage::All) => IndexCoverage::All,
            (IndexCoverage::Indices(mut a), IndexCoverage::Indices(b)) => {
                a.extend(b);
                IndexCoverage::Indices(a)
            }
        }
    }
}

/// Annotations produced while evaluating one schema object against one
/// instance value: the keywords of this frame itself, plus everything
/// merged in from successful in-place applicators (`allOf` branches,
/// `if`/`then`/`else`, `dependentSchemas`, `$ref`/`$dynamicRef`) — any
/// subschema applied to the *same* instance location rather than a child of
/// it. `additionalProperties`/`items` only ever consult `own`;
/// `unevaluatedProperties`/`unevaluatedItems` consult the merged view.
#[derive(Debug, Clone, Default)]
pub struct Annotations {
    own: HashMap<&'static str, Annotation>,
}

impl Annotations {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, keyword: &'static str, annotation: Annotation) {
        match (self.own.remove(keyword), annotation) {
            (None, a) => {
                self.own.insert(keyword, a);
            }
            (Some(Annotation::PropertyNames(mut existing)), Annotation::PropertyNames(new)) => {
                existing.extend(new);
                self.own.insert(keyword, Annotation::PropertyNames(existing));
            }
            (Some(Annotation::ItemCount(existing)), Annotation::ItemCount(new)) => {
                self.own.insert(keyword, Annotation::ItemCount(existing.merge(new)));
            }
            (Some(Annotation::Indices(existing)), Annotation::Indices(new)) => {
                self.own.insert(keyword, Annotation::Indices(existing.merge(new)));
            }
            (Some(_), new) => {
                // A keyword can only ever produce one annotation shape; this
                // only triggers on a programmer error wiring the wrong kind.
                self.own.insert(keyword, new);
            }
        }
    }

    /// Merges `child`'s own annotations into `self`, as a sibling keyword
    /// reading `self` would see them — used when a child frame was applied
    /// in place (same instance location).
    pub fn merge_in_place(&mut self, child: &Annotations) {
        for (keyword, annotation) in &child.own {
            self.record(keyword, annotation.clone());
        }
    }

    #[must_use]
    pub fn get(&self, keyword: &str) -> Option<&Annotation> {
        self.own.get(keyword)
    }

    #[must_use]
    pub fn property_names(&self, keyword: &str) -> BTreeSet<String> {
        match self.get(keyword) {
            Some(Annotation::PropertyNames(set)) => set.clone(),
            _ => BTreeSet::new(),
        }
    }

    #[must_use]
    pub fn item_coverage(&self, keyword: &str) -> ItemCoverage {
        match self.get(keyword) {
            Some(Annotation::ItemCount(c)) => *c,
            _ => ItemCoverage::Count(0),
        }
    }

    /// Union of every `*Properties`-shaped annotation this frame (and its
    /// in-place children, via [`Annotations::merge_in_place`]) has recorded —
    /// what `unevaluatedProperties` treats as already evaluated.
    #[must_use]
    pub fn all_evaluated_properties(&self) -> BTreeSet<String> {
        let mut set = BTreeSet::new();
        for keyword in ["properties", "patternProperties", "additionalProperties", "unevaluatedProperties"] {
            set.extend(self.property_names(keyword));
        }
        set
    }

    /// Highest index `unevaluatedItems` should treat as already evaluated,
    /// aggregating `prefixItems`/`items`/`unevaluatedItems`. `contains` can
    /// also cover indices past this prefix (sparse matches), which callers
    /// must additionally check via [`Annotations::contains_covers`].
    #[must_use]
    pub fn all_evaluated_items(&self) -> ItemCoverage {
        let mut coverage = ItemCoverage::Count(0);
        for keyword in ["prefixItems", "items", "unevaluatedItems"] {
            coverage = coverage.merge(self.item_coverage(keyword));
        }
        if let Some(Annotation::Indices(IndexCoverage::All)) = self.get("contains") {
            coverage = ItemCoverage::All;
        }
        coverage
    }

    /// `true` if `contains` matched the item at `index`, including sparse
    /// (non-prefix) matches that [`Annotations::all_evaluated_items`] can't
    /// express as a single leading count.
    #[must_use]
    pub fn contains_covers(&self, index: usize) -> bool {
        match self.get("contains") {
            Some(Annotation::Indices(coverage)) => coverage.covers(index),
            _ => false,
        }
    }
}

/// The evaluator's stack frame: location bookkeeping plus whether
/// we're in fast-fail mode. Carried by value through the recursive
/// evaluator, cloned and adjusted per descent rather than linked via a
/// parent pointer.
#[derive(Debug, Clone)]
pub struct Ctx {
    /// The base URI currently in scope (updated on every `$id`).
    pub base_uri: String,
    /// Path from the schema document root to the current keyword, used for
    /// `keywordLocation`.
    pub keyword_location: Pointer,
    /// Path from the instance root to the value under evaluation.
    pub instance_location: Pointer,
    /// Set only once evaluation has crossed a `$ref`/`$dynamicRef`: the
    /// absolute location `keywordLocation` resolves to.
    pub absolute_keyword_location: Option<String>,
    /// Every base URI whose scope enclosed this point in the schema, in
    /// outer-to-inner order — consulted by `$dynamicRef` to find the
    /// outermost matching dynamic anchor.
    pub dynamic_scope: Vec<String>,
    /// `true`: abort a subschema at its first failing keyword. `false`:
    /// keep going and collect every failure.
    pub fast_fail: bool,
}

impl Ctx {
    #[must_use]
    pub fn root(base_uri: impl Into<String>, fast_fail: bool) -> Self {
        let base_uri = base_uri.into();
        Ctx {
            dynamic_scope: vec![base_uri.clone()],
            base_uri,
            keyword_location: Pointer::root(),
            instance_location: Pointer::root(),
            absolute_keyword_location: None,
            fast_fail,
        }
    }

    /// A context descending into a subschema at `keyword_segment`, applied
    /// to the same instance value (used by applicators: `allOf`, `not`,
    /// `if`/`then`/`else`, `$ref`, ...).
    #[must_use]
    pub fn keyword(&self, keyword_segment: impl Into<String>) -> Self {
        Ctx {
            keyword_location: self.keyword_location.child(keyword_segment.into()),
            ..self.clone()
        }
    }

    /// A context descending into both a subschema and a child instance
    /// value (used by `properties`, `items`, `contains`, ...).
    #[must_use]
    pub fn descend(&self, keyword_segment: impl Into<String>, instance_segment: impl Into<String>) -> Self {
        Ctx {
            keyword_location: self.keyword_location.child(keyword_segment.into()),
            instance_location: self.instance_location.child(instance_segment.into()),
            ..self.clone()
        }
    }

    /// A context descending into a child instance value only, with the
    /// keyword path unchanged (used after `.keyword(...)` has already
    /// placed the keyword path, e.g. `prefixItems/{i}` over instance `{i}`).
    #[must_use]
    pub fn instance_child(&self, instance_segment: impl Into<String>) -> Self {
        Ctx {
            instance_location: self.instance_location.child(instance_segment.into()),
            ..self.clone()
        }
    }

    /// A context whose instance location is unchanged but whose base URI
    /// enters a new scope — pushed when a subschema declares its own `$id`
    /// or when `$ref`/`$dynamicRef` jumps to a different document.
    #[must_use]
    pub fn enter_base(&self, base_uri: impl Into<String>, absolute_keyword_location: Option<String>) -> Self {
        let base_uri = base_uri.into();
        let mut dynamic_scope = self.dynamic_scope.clone();
        dynamic_scope.push(base_uri.clone());
        Ctx {
            base_uri,
            dynamic_scope,
            absolute_keyword_location: absolute_keyword_location.or_else(|| self.absolute_keyword_location.clone()),
            ..self.clone()
        }
    }
}
