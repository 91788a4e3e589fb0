//! The demonstration routine.
//!
//! Every step computes "the element one past the start" through a different
//! spelling and writes the result into a single scratch value. One step, the
//! cast-then-add-bytes composition, deliberately lands somewhere else.

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::address::Address;
use crate::buffer::{FloatBuffer, ELEMENT_WIDTH};
use crate::config::WalkthroughConfig;
use crate::error::{Result, StrideError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AccessForm {
    TypedIndex,
    InlineCastIndex,
    Deref,
    CastDeref,
    CastDerefRecomputed,
    CastThenAddBytes,
    PointerOffset,
    Index,
}

impl AccessForm {
    pub const ALL: [AccessForm; 8] = [
        AccessForm::TypedIndex,
        AccessForm::InlineCastIndex,
        AccessForm::Deref,
        AccessForm::CastDeref,
        AccessForm::CastDerefRecomputed,
        AccessForm::CastThenAddBytes,
        AccessForm::PointerOffset,
        AccessForm::Index,
    ];

    /// The raw-pointer expression this step models.
    pub fn expression(self) -> &'static str {
        match self {
            AccessForm::TypedIndex => "let other = addr as *const f32; *other.add(0)",
            AccessForm::InlineCastIndex => "*(addr as *const f32).add(0)",
            AccessForm::Deref => "*other",
            AccessForm::CastDeref => "*(addr as *const f32)",
            AccessForm::CastDerefRecomputed => "*((base + size_of::<f32>()) as *const f32)",
            AccessForm::CastThenAddBytes => "*(base as *const f32).add(size_of::<f32>())",
            AccessForm::PointerOffset => "*ptr.add(1)",
            AccessForm::Index => "slice[1]",
        }
    }

    pub fn narrative(self) -> &'static str {
        match self {
            AccessForm::TypedIndex => "bind the advanced address to a typed pointer, then index it",
            AccessForm::InlineCastIndex => "cast and index in one expression, no named pointer",
            AccessForm::Deref => "dereference the typed pointer directly",
            AccessForm::CastDeref => "cast the integer address and dereference it",
            AccessForm::CastDerefRecomputed => {
                "reset to the base, add the byte width, then cast and dereference"
            }
            AccessForm::CastThenAddBytes => {
                "cast first, then add the byte width: the addition counts elements, so this skips 4 floats"
            }
            AccessForm::PointerOffset => "advance the original pointer by one element",
            AccessForm::Index => "index syntax, identical to the pointer offset",
        }
    }

    /// The one composition whose result is meant to differ from the rest.
    pub fn is_divergent(self) -> bool {
        matches!(self, AccessForm::CastThenAddBytes)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Step {
    /// The expression this step evaluated.
    pub label: &'static str,
    pub form: AccessForm,
    pub expected: f32,
    pub observed: f32,
}

impl Step {
    pub fn matches(&self) -> bool {
        self.expected == self.observed
    }

    pub fn divergent(&self) -> bool {
        self.form.is_divergent()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AddressCheck {
    pub label: &'static str,
    pub lhs: Address,
    pub rhs: Address,
    pub equal: bool,
}

impl AddressCheck {
    pub fn new(label: &'static str, lhs: Address, rhs: Address) -> Self {
        Self {
            label,
            lhs,
            rhs,
            equal: lhs == rhs,
        }
    }
}

/// Everything the routine wrote to its scratch variables, in order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Trace {
    pub element_count: usize,
    pub base: Address,
    pub steps: Vec<Step>,
    pub address_checks: Vec<AddressCheck>,
}

impl Trace {
    pub fn scratch_values(&self) -> Vec<f32> {
        self.steps.iter().map(|step| step.observed).collect()
    }

    pub fn step(&self, form: AccessForm) -> Option<&Step> {
        self.steps.iter().find(|step| step.form == form)
    }

    pub fn divergent_steps(&self) -> impl Iterator<Item = &Step> {
        self.steps.iter().filter(|step| step.divergent())
    }

    pub fn all_addresses_agree(&self) -> bool {
        self.address_checks.iter().all(|check| check.equal)
    }
}

struct Recorder {
    strict: bool,
    steps: Vec<Step>,
}

impl Recorder {
    fn new(strict: bool) -> Self {
        Self {
            strict,
            steps: Vec::with_capacity(AccessForm::ALL.len()),
        }
    }

    fn record(&mut self, form: AccessForm, expected: f32, observed: f32) -> Result<()> {
        let step = Step {
            label: form.expression(),
            form,
            expected,
            observed,
        };
        debug!(form = ?form, expected, observed, "step");
        if !step.matches() {
            if self.strict {
                return Err(StrideError::divergence(form.expression(), expected, observed));
            }
            warn!(form = ?form, expected, observed, "step did not read its expected element");
        } else if form.is_divergent() {
            warn!(
                expected,
                observed, "cast-then-add advanced by elements, not bytes"
            );
        }
        self.steps.push(step);
        Ok(())
    }
}

pub struct Walkthrough;

impl Walkthrough {
    /// Allocate the buffer, run every step once, and hand back the trace.
    /// The buffer is dropped before returning.
    pub fn run(config: &WalkthroughConfig) -> Result<Trace> {
        config.validate()?;

        let buffer = FloatBuffer::new(config.element_count);
        let my_float_ptr = buffer.cursor();
        let one = buffer[1];
        let mut recorder = Recorder::new(config.strict);

        let mut float_array_address = buffer.base_address();
        float_array_address += ELEMENT_WIDTH;

        let my_other_float_ptr = float_array_address.cast(&buffer)?;
        recorder.record(AccessForm::TypedIndex, one, my_other_float_ptr.at(0)?)?;
        recorder.record(
            AccessForm::InlineCastIndex,
            one,
            float_array_address.cast(&buffer)?.at(0)?,
        )?;
        recorder.record(AccessForm::Deref, one, my_other_float_ptr.read()?)?;
        recorder.record(
            AccessForm::CastDeref,
            one,
            buffer.read_at(float_array_address)?,
        )?;

        float_array_address = buffer.base_address();
        recorder.record(
            AccessForm::CastDerefRecomputed,
            one,
            (float_array_address + ELEMENT_WIDTH).cast(&buffer)?.read()?,
        )?;

        // The byte width is added to an element pointer here, so it counts elements.
        let skipped = float_array_address.cast(&buffer)? + ELEMENT_WIDTH;
        recorder.record(
            AccessForm::CastThenAddBytes,
            buffer[ELEMENT_WIDTH],
            skipped.read()?,
        )?;

        recorder.record(AccessForm::PointerOffset, one, (my_float_ptr + 1).read()?)?;
        recorder.record(AccessForm::Index, one, my_float_ptr.at(1)?)?;

        let base = buffer.base_address();
        let plus_one = (my_float_ptr + 1).address();
        let index_one = buffer.address_of(1)?;
        let integer_plus_width = base + ELEMENT_WIDTH;
        let address_checks = vec![
            AddressCheck::new("&buf[0] == buf", buffer.address_of(0)?, my_float_ptr.address()),
            AddressCheck::new("buf + 1 == &buf[1]", plus_one, index_one),
            AddressCheck::new(
                "&buf[1] == buf as usize + size_of::<f32>()",
                index_one,
                integer_plus_width,
            ),
            AddressCheck::new(
                "buf + 1 == buf as usize + size_of::<f32>()",
                plus_one,
                integer_plus_width,
            ),
        ];

        let trace = Trace {
            element_count: buffer.len(),
            base,
            steps: recorder.steps,
            address_checks,
        };
        info!(
            steps = trace.steps.len(),
            addresses_agree = trace.all_addresses_agree(),
            "walkthrough finished"
        );
        Ok(trace)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn default_trace() -> Trace {
        Walkthrough::run(&WalkthroughConfig::default()).unwrap()
    }

    #[test]
    fn test_scratch_sequence() {
        let trace = default_trace();
        assert_eq!(
            trace.scratch_values(),
            vec![1.0, 1.0, 1.0, 1.0, 1.0, 4.0, 1.0, 1.0]
        );
    }

    #[test]
    fn test_steps_follow_declared_order() {
        let forms: Vec<AccessForm> = default_trace().steps.iter().map(|s| s.form).collect();
        assert_eq!(forms, AccessForm::ALL.to_vec());
    }

    #[test]
    fn test_only_cast_then_add_diverges() {
        let trace = default_trace();
        let divergent: Vec<_> = trace.divergent_steps().collect();
        assert_eq!(divergent.len(), 1);
        assert_eq!(divergent[0].form, AccessForm::CastThenAddBytes);
        assert_eq!(divergent[0].observed, 4.0);
        assert_ne!(divergent[0].observed, trace.step(AccessForm::Index).unwrap().observed);
    }

    #[test]
    fn test_every_step_matches_expectation() {
        assert!(default_trace().steps.iter().all(Step::matches));
    }

    #[test]
    fn test_address_checks_agree() {
        let trace = default_trace();
        assert_eq!(trace.address_checks.len(), 4);
        assert!(trace.all_addresses_agree());
        assert_eq!(trace.address_checks[1].lhs, trace.base + ELEMENT_WIDTH);
    }

    #[test]
    fn test_larger_buffer_same_results() {
        let config = WalkthroughConfig {
            element_count: 64,
            ..Default::default()
        };
        let trace = Walkthrough::run(&config).unwrap();
        assert_eq!(trace.element_count, 64);
        assert_eq!(trace.scratch_values(), default_trace().scratch_values());
    }

    #[test]
    fn test_too_small_buffer_rejected() {
        let config = WalkthroughConfig {
            element_count: 4,
            ..Default::default()
        };
        assert!(matches!(
            Walkthrough::run(&config),
            Err(StrideError::Config(_))
        ));
    }

    #[test]
    fn test_strict_recorder_rejects_mismatch() {
        let mut recorder = Recorder::new(true);
        let err = recorder.record(AccessForm::Index, 1.0, 2.0).unwrap_err();
        assert!(matches!(err, StrideError::Divergence { .. }));
        assert!(recorder.steps.is_empty());
    }

    #[test]
    fn test_lenient_recorder_keeps_mismatch() {
        let mut recorder = Recorder::new(false);
        recorder.record(AccessForm::Index, 1.0, 2.0).unwrap();
        assert!(!recorder.steps[0].matches());
    }

    #[test]
    fn test_divergent_form_is_still_checked() {
        let mut recorder = Recorder::new(true);
        let err = recorder
            .record(AccessForm::CastThenAddBytes, 4.0, 1.0)
            .unwrap_err();
        assert_eq!(
            err,
            StrideError::divergence(AccessForm::CastThenAddBytes.expression(), 4.0, 1.0)
        );
        assert!(recorder.steps.is_empty());

        recorder.record(AccessForm::CastThenAddBytes, 4.0, 4.0).unwrap();
        assert_eq!(recorder.steps.len(), 1);
    }

    #[test]
    fn test_steps_carry_their_expression() {
        let trace = default_trace();
        for step in &trace.steps {
            assert_eq!(step.label, step.form.expression());
        }
    }

    #[test]
    fn test_address_check_records_equality() {
        let check = AddressCheck::new("a == b", Address::new(8), Address::new(12));
        assert!(!check.equal);
        assert!(AddressCheck::new("a == a", Address::new(8), Address::new(8)).equal);
    }
}
