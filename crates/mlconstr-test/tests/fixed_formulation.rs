//! Fixed formulations: with the input pinned to examples, the solved output
//! must agree with the predictor.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use mlconstr_core::{MlConstrError, OutputType, Predictor, Result};
use mlconstr_model::{MVar, Model, Sense};
use mlconstr_predictors::{Embed, EmbedOptions, LinearRegression};
use mlconstr_test::{
    datasets, fixed_model, fixed_model_with, harness_params, run_case, tolerance_scale, CaseSampler,
    Combine, FixedHarness, FixedOutcome, HarnessError,
};
use ndarray::{array, ArrayD, ArrayView2};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::{Context, SubscriberExt};
use tracing_subscriber::Layer;

const PROBABILITY_TYPES: [OutputType; 3] = [
    OutputType::Regular,
    OutputType::ProbabilityPositiveClass,
    OutputType::Probability,
];

#[test]
fn test_harness_params() {
    let params = harness_params().unwrap();
    assert_eq!(params.output_flag, 0);
    assert_eq!(params.non_convex, 2);
}

#[test]
fn test_example_row_linear() {
    let examples = datasets::example_row();
    let reg = datasets::regressor().unwrap();

    let outcome = fixed_model(&reg, &examples, false, EmbedOptions::new()).unwrap();
    match outcome {
        FixedOutcome::Passed { max_error, tol } => {
            // y = 0.3 - 2.04 - 6.0 + 0.7, so the tolerance scales by |y|
            assert!((tol - 1e-5 * 7.04).abs() < 1e-9);
            assert!(max_error <= tol);
        }
        other => panic!("unexpected outcome {:?}", other),
    }
}

#[test]
fn test_example_row_logistic_all_output_types() {
    let examples = datasets::example_row();
    let clf = datasets::classifier().unwrap();

    for output_type in PROBABILITY_TYPES {
        let options = EmbedOptions::new().with_output_type(output_type);
        let outcome = fixed_model(&clf, &examples, true, options).unwrap();
        assert!(outcome.is_passed(), "{}: {:?}", output_type, outcome);
    }
}

#[test]
fn test_multi_target_regression() {
    let reg = datasets::multi_regressor().unwrap();
    let outcome = fixed_model_with(
        &reg,
        &datasets::features(),
        false,
        EmbedOptions::new(),
        |constr| {
            assert_eq!(constr.n_outputs(), Some(2));
            assert_eq!(constr.output().shape(), (8, 2));
            Ok(())
        },
    )
    .unwrap();
    assert!(outcome.is_passed());
}

#[test]
fn test_classifier_declares_no_output_count() {
    let clf = datasets::classifier().unwrap();
    let options = EmbedOptions::new().with_output_type(OutputType::ProbabilityPositiveClass);
    fixed_model_with(&clf, &datasets::features(), true, options, |constr| {
        assert_eq!(constr.n_outputs(), None);
        assert_eq!(constr.getter().output_type(), OutputType::ProbabilityPositiveClass);
        Ok(())
    })
    .unwrap();
}

#[test]
fn test_sampled_cases() {
    let x = datasets::features();
    let reg = datasets::regressor().unwrap();
    let clf = datasets::classifier().unwrap();
    let mut sampler = CaseSampler::new();

    for (n_sample, combine) in [(1, Combine::None), (4, Combine::All), (6, Combine::Pairs)] {
        let outcome = run_case(
            &mut sampler,
            &reg,
            &x,
            n_sample,
            combine,
            false,
            EmbedOptions::new(),
        )
        .unwrap();
        assert!(outcome.is_passed(), "linear {}", combine);

        for output_type in PROBABILITY_TYPES {
            let options = EmbedOptions::new().with_output_type(output_type);
            let outcome =
                run_case(&mut sampler, &clf, &x, n_sample, combine, true, options).unwrap();
            assert!(outcome.is_passed(), "logistic {} {}", combine, output_type);
        }
    }
}

#[derive(Clone, Default)]
struct WarnCounter(Arc<AtomicUsize>);

impl<S: Subscriber> Layer<S> for WarnCounter {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        if *event.metadata().level() == Level::WARN {
            self.0.fetch_add(1, Ordering::SeqCst);
        }
    }
}

#[test]
fn test_size_limited_license_skips() {
    let warnings = WarnCounter::default();
    let subscriber = tracing_subscriber::registry().with(warnings.clone());

    let outcome = tracing::subscriber::with_default(subscriber, || {
        let harness = FixedHarness::with_params(harness_params().unwrap().with_size_limit(2));
        harness
            .run(
                datasets::regressor().unwrap(),
                &datasets::features(),
                false,
                EmbedOptions::new(),
            )
            .unwrap()
    });

    assert!(outcome.is_skipped());
    assert_eq!(warnings.0.load(Ordering::SeqCst), 1);
}

#[test]
fn test_unfitted_predictor_fails() {
    let err = fixed_model(
        LinearRegression::default(),
        &datasets::example_row(),
        false,
        EmbedOptions::new(),
    )
    .unwrap_err();
    assert!(matches!(
        err,
        HarnessError::Core(MlConstrError::NotFitted { .. })
    ));
}

/// Predicts its single feature but is formulated as `y = x + offset`.
struct Shifted(f64);

impl Predictor for Shifted {
    fn name(&self) -> &str {
        "Shifted"
    }

    fn is_fitted(&self) -> bool {
        true
    }

    fn n_features_in(&self) -> Option<usize> {
        Some(1)
    }

    fn predict(&self, x: ArrayView2<f64>) -> Result<ArrayD<f64>> {
        Ok(x.column(0).to_owned().into_dyn())
    }
}

impl Embed for Shifted {
    fn embed(&self, model: &mut Model<'_>, input: &MVar, _options: &EmbedOptions) -> Result<MVar> {
        let output = model.add_mvar((input.nrows(), 1), f64::NEG_INFINITY, f64::INFINITY);
        for i in 0..input.nrows() {
            model.add_linear(
                &[(output.at(i, 0), 1.0), (input.at(i, 0), -1.0)],
                Sense::Equal,
                self.0,
            );
        }
        Ok(output)
    }
}

#[test]
fn test_wrong_formulation_exceeds_tolerance() {
    let err =
        fixed_model(Shifted(1.0), &array![[2.0], [0.5]], false, EmbedOptions::new()).unwrap_err();
    match err {
        HarnessError::ToleranceExceeded { max_error, tol } => {
            assert!((max_error - 1.0).abs() < 1e-6);
            assert!(tol < 1e-3);
        }
        other => panic!("unexpected error {:?}", other),
    }
}

#[test]
fn test_sub_unit_output_tightens_tolerance() {
    let examples = array![[0.1]];
    assert!(fixed_model(Shifted(0.0), &examples, false, EmbedOptions::new())
        .unwrap()
        .is_passed());

    // 8e-6 is within the base tolerance but not within 1e-5 * |y|.
    let err = fixed_model(Shifted(8e-6), &examples, false, EmbedOptions::new()).unwrap_err();
    match err {
        HarnessError::ToleranceExceeded { max_error, tol } => {
            assert!((max_error - 8e-6).abs() < 1e-9);
            assert!((tol - 1e-5 * 0.100008).abs() < 1e-9);
        }
        other => panic!("unexpected error {:?}", other),
    }
}

#[test]
fn test_probability_tolerance_scales_with_output() {
    let examples = datasets::example_row();
    let clf = datasets::classifier().unwrap();
    let p = clf.predict_proba(examples.view()).unwrap()[(0, 1)];
    assert!(p < 0.5);

    let options = EmbedOptions::new().with_output_type(OutputType::ProbabilityPositiveClass);
    match fixed_model(&clf, &examples, true, options).unwrap() {
        FixedOutcome::Passed { tol, .. } => assert!((tol - 5e-3 * p).abs() < 1e-9),
        other => panic!("unexpected outcome {:?}", other),
    }
}

#[test]
fn test_tolerance_scale() {
    assert_eq!(tolerance_scale(&array![[0.0, 0.0]]), 1.0);
    assert_eq!(tolerance_scale(&array![[0.25, -0.5]]), 0.5);
    assert_eq!(tolerance_scale(&array![[-7.0, 2.0]]), 7.0);
}
