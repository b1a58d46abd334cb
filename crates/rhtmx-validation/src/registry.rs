//! Constraint registry and built-in detectors
//!
//! A detector looks at a field and either declines (the constraint does not
//! apply) or returns a [`Validator`] closed over the parameters it read.
//! Detectors run on every pass so configuration changes apply immediately.

use crate::constraint::{ConstraintName, MessageKey, Outcome};
use crate::error::{Result, ValidationError};
use crate::field::{keys, FieldAdapter};
use crate::patterns::TypeKind;
use regex::{Regex, RegexBuilder};

/// A bound check: value in, outcome out
pub type Validator = Box<dyn Fn(&str) -> Outcome>;

/// Decides whether a constraint applies to a field
pub type Detector = Box<dyn Fn(&dyn FieldAdapter) -> Result<Option<Validator>>>;

/// Applicable constraints in registry order
pub type Applicable = Vec<(ConstraintName, Validator)>;

/// Ordered table of named constraint detectors
pub struct ConstraintRegistry {
    detectors: Vec<(ConstraintName, Detector)>,
    strict_empty_values: bool,
}

impl ConstraintRegistry {
    /// Registry with no detectors
    pub fn empty() -> Self {
        Self {
            detectors: Vec::new(),
            strict_empty_values: false,
        }
    }

    /// Registry holding every built-in detector
    ///
    /// With `strict_empty_values` the `type` constraint stays applicable to
    /// empty values and reports them invalid.
    pub fn builtin(strict_empty_values: bool) -> Self {
        let mut registry = Self::empty();
        registry.strict_empty_values = strict_empty_values;
        registry.register(ConstraintName::Required, Box::new(detect_required));
        registry.register(ConstraintName::Min, Box::new(detect_min));
        registry.register(ConstraintName::Max, Box::new(detect_max));
        registry.register(ConstraintName::MinLength, Box::new(detect_min_length));
        registry.register(ConstraintName::MaxLength, Box::new(detect_max_length));
        registry.register(ConstraintName::Range, Box::new(detect_range));
        registry.register(ConstraintName::RangeLength, Box::new(detect_range_length));
        registry.register(ConstraintName::NotBlank, Box::new(detect_not_blank));
        registry.register(ConstraintName::NotNull, Box::new(detect_not_null));
        registry.register(ConstraintName::Regexp, Box::new(detect_regexp));
        registry.register(ConstraintName::Type, Box::new(detect_type));
        registry
    }

    /// Add a detector, replacing any detector already under that name
    pub fn register(&mut self, name: ConstraintName, detector: Detector) {
        match self.detectors.iter_mut().find(|(n, _)| *n == name) {
            Some(entry) => entry.1 = detector,
            None => self.detectors.push((name, detector)),
        }
    }

    /// Registered names in insertion order
    pub fn names(&self) -> impl Iterator<Item = &ConstraintName> {
        self.detectors.iter().map(|(name, _)| name)
    }

    /// Run every detector once and collect the applicable validators
    ///
    /// Detectors always run, so a broken declaration is reported even while
    /// the field is empty. Non-presence constraints are then dropped for
    /// empty values.
    pub fn detect(&self, field: &dyn FieldAdapter) -> Result<Applicable> {
        let empty = field.value().is_empty();
        let mut applicable = Applicable::new();

        for (name, detector) in &self.detectors {
            let Some(validator) = detector(field)? else {
                continue;
            };

            let keep_empty = name.is_presence()
                || (self.strict_empty_values && *name == ConstraintName::Type);
            if empty && !keep_empty {
                tracing::trace!(constraint = %name, "skipped for empty value");
                continue;
            }

            tracing::trace!(constraint = %name, "constraint applies");
            applicable.push((name.clone(), validator));
        }

        Ok(applicable)
    }
}

impl Default for ConstraintRegistry {
    fn default() -> Self {
        Self::builtin(false)
    }
}

fn option_flag(field: &dyn FieldAdapter, name: &str) -> bool {
    field.option(name).map(|v| v.to_bool()).unwrap_or(false)
}

/// Numeric bound from the native attribute, else the declared option
fn numeric_bound(field: &dyn FieldAdapter, name: &str) -> Result<Option<f64>> {
    if let Some(raw) = field.attribute(name) {
        return parse_numeric(&raw)
            .map(Some)
            .ok_or_else(|| ValidationError::invalid_option(name, format!("`{}` is not a number", raw)));
    }

    match field.option(name) {
        Some(value) => value
            .as_number()
            .map(Some)
            .ok_or_else(|| ValidationError::invalid_option(name, format!("`{}` is not a number", value))),
        None => Ok(None),
    }
}

fn length_bound(field: &dyn FieldAdapter, name: &str) -> Result<Option<usize>> {
    match field.option(name) {
        Some(value) => value
            .as_number()
            .filter(|n| *n >= 0.0 && n.fract() == 0.0)
            .map(|n| Some(n as usize))
            .ok_or_else(|| {
                ValidationError::invalid_option(name, format!("`{}` is not a length", value))
            }),
        None => Ok(None),
    }
}

fn range_bound(field: &dyn FieldAdapter, name: &str) -> Result<Option<(f64, f64)>> {
    let Some(value) = field.option(name) else {
        return Ok(None);
    };

    let (min, max) = value.as_range().ok_or_else(|| {
        ValidationError::invalid_option(name, format!("`{}` is not a [min, max] pair", value))
    })?;
    if min > max {
        return Err(ValidationError::invalid_option(
            name,
            format!("lower bound {} exceeds upper bound {}", min, max),
        ));
    }
    Ok(Some((min, max)))
}

fn parse_numeric(value: &str) -> Option<f64> {
    value.trim().parse::<f64>().ok().filter(|n| n.is_finite())
}

fn detect_required(field: &dyn FieldAdapter) -> Result<Option<Validator>> {
    if !field.has_flag(keys::REQUIRED) && !option_flag(field, keys::REQUIRED) {
        return Ok(None);
    }

    // notnull and notblank at once
    Ok(Some(Box::new(|value: &str| {
        Outcome::new(
            ConstraintName::Required,
            !value.trim().is_empty(),
            MessageKey::Required,
        )
    })))
}

fn detect_not_blank(field: &dyn FieldAdapter) -> Result<Option<Validator>> {
    if !option_flag(field, keys::NOT_BLANK) {
        return Ok(None);
    }

    Ok(Some(Box::new(|value: &str| {
        Outcome::new(
            ConstraintName::NotBlank,
            !value.trim().is_empty(),
            MessageKey::NotBlank,
        )
    })))
}

fn detect_not_null(field: &dyn FieldAdapter) -> Result<Option<Validator>> {
    if !option_flag(field, keys::NOT_NULL) {
        return Ok(None);
    }

    Ok(Some(Box::new(|value: &str| {
        Outcome::new(ConstraintName::NotNull, !value.is_empty(), MessageKey::NotNull)
    })))
}

fn detect_min(field: &dyn FieldAdapter) -> Result<Option<Validator>> {
    let Some(min) = numeric_bound(field, keys::MIN)? else {
        return Ok(None);
    };

    Ok(Some(Box::new(move |value: &str| {
        let valid = parse_numeric(value).map_or(false, |n| n >= min);
        Outcome::new(ConstraintName::Min, valid, MessageKey::Min).with_param("min", min)
    })))
}

fn detect_max(field: &dyn FieldAdapter) -> Result<Option<Validator>> {
    let Some(max) = numeric_bound(field, keys::MAX)? else {
        return Ok(None);
    };

    Ok(Some(Box::new(move |value: &str| {
        let valid = parse_numeric(value).map_or(false, |n| n <= max);
        Outcome::new(ConstraintName::Max, valid, MessageKey::Max).with_param("max", max)
    })))
}

fn detect_range(field: &dyn FieldAdapter) -> Result<Option<Validator>> {
    let Some((min, max)) = range_bound(field, keys::RANGE)? else {
        return Ok(None);
    };

    Ok(Some(Box::new(move |value: &str| {
        let valid = parse_numeric(value).map_or(false, |n| n >= min && n <= max);
        Outcome::new(ConstraintName::Range, valid, MessageKey::Range)
            .with_param("min", min)
            .with_param("max", max)
    })))
}

fn detect_min_length(field: &dyn FieldAdapter) -> Result<Option<Validator>> {
    let Some(min) = length_bound(field, keys::MIN_LENGTH)? else {
        return Ok(None);
    };

    Ok(Some(Box::new(move |value: &str| {
        let valid = value.chars().count() >= min;
        Outcome::new(ConstraintName::MinLength, valid, MessageKey::MinLength)
            .with_param("min", min)
    })))
}

fn detect_max_length(field: &dyn FieldAdapter) -> Result<Option<Validator>> {
    let Some(max) = length_bound(field, keys::MAX_LENGTH)? else {
        return Ok(None);
    };

    Ok(Some(Box::new(move |value: &str| {
        let valid = value.chars().count() <= max;
        Outcome::new(ConstraintName::MaxLength, valid, MessageKey::MaxLength)
            .with_param("max", max)
    })))
}

fn detect_range_length(field: &dyn FieldAdapter) -> Result<Option<Validator>> {
    let Some((min, max)) = range_bound(field, keys::RANGE_LENGTH)? else {
        return Ok(None);
    };

    Ok(Some(Box::new(move |value: &str| {
        let len = value.chars().count() as f64;
        Outcome::new(
            ConstraintName::RangeLength,
            len >= min && len <= max,
            MessageKey::RangeLength,
        )
        .with_param("min", min)
        .with_param("max", max)
    })))
}

/// Native `pattern` (anchored) wins over the declared `regexp` option
fn detect_regexp(field: &dyn FieldAdapter) -> Result<Option<Validator>> {
    let regex = if let Some(pattern) = field.attribute(keys::PATTERN) {
        compile(keys::PATTERN, &format!("^(?:{})$", pattern), "")?
    } else if let Some(pattern) = field.option(keys::REGEXP) {
        let flags = field
            .option(keys::REGEXP_FLAG)
            .map(|v| v.to_string())
            .unwrap_or_default();
        compile(keys::REGEXP, &pattern.to_string(), &flags)?
    } else {
        return Ok(None);
    };

    Ok(Some(Box::new(move |value: &str| {
        Outcome::new(ConstraintName::Regexp, regex.is_match(value), MessageKey::Regexp)
            .with_param("pattern", regex.as_str())
    })))
}

fn compile(source_name: &str, pattern: &str, flags: &str) -> Result<Regex> {
    let mut builder = RegexBuilder::new(pattern);
    for flag in flags.chars() {
        match flag {
            'i' => builder.case_insensitive(true),
            'm' => builder.multi_line(true),
            's' => builder.dot_matches_new_line(true),
            'x' => builder.ignore_whitespace(true),
            other => {
                return Err(ValidationError::invalid_option(
                    keys::REGEXP_FLAG,
                    format!("unsupported flag `{}`", other),
                ))
            }
        };
    }

    builder.build().map_err(|error| ValidationError::InvalidPattern {
        source_name: source_name.to_string(),
        error,
    })
}

/// Declared `type` option must name a catalog type; native types may not
fn detect_type(field: &dyn FieldAdapter) -> Result<Option<Validator>> {
    let Some(declared) = field.declared_type() else {
        return Ok(None);
    };

    let kind = match declared.parse::<TypeKind>() {
        Ok(kind) => kind,
        Err(()) if field.option(keys::TYPE).is_some() => {
            return Err(ValidationError::UnknownType(declared))
        }
        Err(()) => return Ok(None),
    };

    Ok(Some(Box::new(move |value: &str| {
        Outcome::new(ConstraintName::Type, kind.matches(value), MessageKey::Type(kind))
            .with_param("type", kind.as_str())
    })))
}
