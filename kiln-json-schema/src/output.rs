/*
░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░
╔═══════════════════════════════════════════════════════════════════════╗
║                                                                       ║
║                                Output                                  ║
║                                ¯¯¯¯¯¯¯                                  ║
╚═══════════════════════════════════════════════════════════════════════╝
░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░
*/

use kiln_core::Value;

const VALID: &str = "valid";
const KEYWORD_LOCATION: &str = "keywordLocation";
const INSTANCE_LOCATION: &str = "instanceLocation";
const ABSOLUTE_KEYWORD_LOCATION: &str = "absoluteKeywordLocation";
const ANNOTATION: &str = "annotation";
const ANNOTATIONS: &str = "annotations";
const ERROR: &str = "error";
const ERRORS: &str = "errors";

/// How much of an [`OutputUnit`] tree is rendered into the final output
/// [`Value`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Just `{"valid": bool}`.
    Flag,
    /// `valid` plus one flat list of failing leaf units.
    #[default]
    Basic,
    /// The full nested annotation/error tree.
    Verbose,
}

/// One node in the evaluation output tree: a fixed set of
/// location members, plus either a scalar annotation/error at this frame
/// or a list of child units, never both populated at once for the same
/// slot.
#[derive(Debug, Clone)]
pub struct OutputUnit {
    pub valid: bool,
    pub keyword_location: String,
    pub instance_location: String,
    pub absolute_keyword_location: Option<String>,
    pub annotation: Option<Value>,
    pub annotations: Vec<OutputUnit>,
    pub error: Option<String>,
    pub errors: Vec<OutputUnit>,
}

impl OutputUnit {
    #[must_use]
    pub fn valid(keyword_location: impl Into<String>, instance_location: impl Into<String>) -> Self {
        OutputUnit {
            valid: true,
            keyword_location: keyword_location.into(),
            instance_location: instance_location.into(),
            absolute_keyword_location: None,
            annotation: None,
            annotations: Vec::new(),
            error: None,
            errors: Vec::new(),
        }
    }

    #[must_use]
    pub fn invalid(
        keyword_location: impl Into<String>,
        instance_location: impl Into<String>,
        error: impl Into<String>,
    ) -> Self {
        OutputUnit {
            valid: false,
            keyword_location: keyword_location.into(),
            instance_location: instance_location.into(),
            absolute_keyword_location: None,
            annotation: None,
            annotations: Vec::new(),
            error: Some(error.into()),
            errors: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_absolute_keyword_location(mut self, location: impl Into<String>) -> Self {
        self.absolute_keyword_location = Some(location.into());
        self
    }

    #[must_use]
    pub fn with_annotation(mut self, value: Value) -> Self {
        self.annotation = Some(value);
        self
    }

    /// Rolls up a set of child units produced by evaluating sibling
    /// subschemas (array items, `allOf` branches, object members) into one
    /// parent unit: valid iff every child is valid, children partitioned
    /// into `annotations` (valid children) and `errors` (invalid children).
    #[must_use]
    pub fn collect(
        keyword_location: impl Into<String>,
        instance_location: impl Into<String>,
        children: Vec<OutputUnit>,
    ) -> Self {
        let valid = children.iter().all(|c| c.valid);
        let mut unit = OutputUnit {
            valid,
            keyword_location: keyword_location.into(),
            instance_location: instance_location.into(),
            absolute_keyword_location: None,
            annotation: None,
            annotations: Vec::new(),
            error: None,
            errors: Vec::new(),
        };
        for child in children {
            if child.valid {
                unit.annotations.push(child);
            } else {
                unit.errors.push(child);
            }
        }
        unit
    }

    /// Renders this unit into a [`Value`] under the requested `format`.
    #[must_use]
    pub fn to_value(&self, format: OutputFormat) -> Value {
        match format {
            OutputFormat::Flag => {
                let obj = kiln_core::Map::new();
                obj.insert(VALID, Value::from(self.valid));
                Value::Object(obj)
            }
            OutputFormat::Basic => {
                let obj = kiln_core::Map::new();
                obj.insert(VALID, Value::from(self.valid));
                if !self.valid {
                    let leaves = self.leaf_errors();
                    obj.insert(
                        ERRORS,
                        Value::Array(leaves.into_iter().map(|u| u.flat_value()).collect()),
                    );
                }
                Value::Object(obj)
            }
            OutputFormat::Verbose => self.verbose_value(),
        }
    }

    fn flat_value(&self) -> Value {
        let obj = kiln_core::Map::new();
        obj.insert(VALID, Value::from(self.valid));
        obj.insert(KEYWORD_LOCATION, Value::from(self.keyword_location.as_str()));
        obj.insert(INSTANCE_LOCATION, Value::from(self.instance_location.as_str()));
        if let Some(loc) = &self.absolute_keyword_location {
            obj.insert(ABSOLUTE_KEYWORD_LOCATION, Value::from(loc.as_str()));
        }
        if let Some(err) = &self.error {
            obj.insert(ERROR, Value::from(err.as_str()));
        }
        Value::Object(obj)
    }

    fn verbose_value(&self) -> Value {
        let obj = kiln_core::Map::new();
        obj.insert(VALID, Value::from(self.valid));
        obj.insert(KEYWORD_LOCATION, Value::from(self.keyword_location.as_str()));
        obj.insert(INSTANCE_LOCATION, Value::from(self.instance_location.as_str()));
        if let Some(loc) = &self.absolute_keyword_location {
            obj.insert(ABSOLUTE_KEYWORD_LOCATION, Value::from(loc.as_str()));
        }
        if let Some(annotation) = &self.annotation {
            obj.insert(ANNOTATION, annotation.clone());
        }
        if !self.annotations.is_empty() {
            obj.insert(
                ANNOTATIONS,
                Value::Array(self.annotations.iter().map(OutputUnit::verbose_value).collect()),
            );
        }
        if let Some(err) = &self.error {
            obj.insert(ERROR, Value::from(err.as_str()));
        }
        if !self.errors.is_empty() {
            obj.insert(
                ERRORS,
                Value::Array(self.errors.iter().map(OutputUnit::verbose_value).collect()),
            );
        }
        Value::Object(obj)
    }

    fn leaf_errors(&self) -> Vec<&OutputUnit> {
        if self.errors.is_empty() {
            if self.valid {
                Vec::new()
            } else {
                vec![self]
            }
        } else {
            self.errors.iter().flat_map(OutputUnit::leaf_errors).collect()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flag_output_has_only_valid() {
        let unit = OutputUnit::valid("#", "#");
        let v = unit.to_value(OutputFormat::Flag);
        assert_eq!(v.get("valid").as_bool(), Some(true));
        assert!(v.get("errors").is_invalid());
    }

    #[test]
    fn basic_output_flattens_nested_errors() {
        let leaf = OutputUnit::invalid("#/allOf/0/type", "#", "expected string");
        let unit = OutputUnit::collect("#/allOf", "#", vec![leaf]);
        let v = unit.to_value(OutputFormat::Basic);
        assert_eq!(v.get("valid").as_bool(), Some(false));
        assert_eq!(v.get("errors").as_array().unwrap().len(), 1);
    }
}
