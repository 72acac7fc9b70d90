//! Training loop and the trained [`Classifier`].
//!
//! ## Algorithm
//! 1. Validate config and input shapes
//! 2. Hold out the last `validation_split` fraction of rows
//! 3. Each epoch: shuffle training rows, run mini-batch Adam on BCE loss
//! 4. After each epoch compute validation loss in inference mode
//! 5. Stop once validation loss has not improved for `patience` epochs
//! 6. Return the weights from the best validation epoch

use crate::config::ClassifierConfig;
use crate::error::{ClassifierError, Result};
use crate::layers::Adam;
use crate::metrics::roc_auc;
use crate::network::{Network, bce_from_logits, bce_gradient};
use crate::scorer::Scorer;
use ndarray::{Array1, ArrayView2, Axis};
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use serde::Serialize;
use tracing::{debug, info};

/// Summary of one training run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrainingReport {
    pub epochs_run: usize,
    /// 1-based epoch whose weights were kept
    pub best_epoch: usize,
    pub best_validation_loss: f32,
    pub stopped_early: bool,
    pub training_rows: usize,
    pub validation_rows: usize,
    /// Accuracy at a 0.5 threshold on the validation rows
    pub validation_accuracy: f32,
    /// `None` if the validation rows are all one class
    pub validation_auc: Option<f32>,
}

/// A trained binary classifier. Read-only once built.
#[derive(Debug, Clone)]
pub struct Classifier {
    network: Network,
    config: ClassifierConfig,
}

impl Classifier {
    /// Train on `features` (rows x width) against 0/1 `labels`.
    pub fn train(
        features: ArrayView2<'_, f32>,
        labels: &[u8],
        config: &ClassifierConfig,
    ) -> Result<(Self, TrainingReport)> {
        config.validate()?;
        check_inputs(features, labels)?;

        let rows = features.nrows();
        // At least one validation row even when rounding says otherwise
        let split_at = ((rows as f32 * (1.0 - config.validation_split)).floor() as usize)
            .min(rows.saturating_sub(1));
        if split_at == 0 {
            return Err(ClassifierError::EmptyTrainingSplit {
                rows,
                split: config.validation_split,
            });
        }

        let targets: Array1<f32> = labels.iter().map(|&l| f32::from(l)).collect();
        let train_x = features.slice(ndarray::s![..split_at, ..]);
        let train_y = targets.slice(ndarray::s![..split_at]);
        let val_x = features.slice(ndarray::s![split_at.., ..]);
        let val_y = targets.slice(ndarray::s![split_at..]);

        let mut rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };

        info!(
            training_rows = split_at,
            validation_rows = rows - split_at,
            width = features.ncols(),
            "Training classifier"
        );

        let mut network = Network::new(features.ncols(), config, &mut rng);
        let mut adam = Adam::new(config.learning_rate);
        let mut order: Vec<usize> = (0..split_at).collect();

        let mut best = network.clone();
        let mut best_loss = f32::INFINITY;
        let mut best_epoch = 0;
        let mut wait = 0;
        let mut epochs_run = 0;
        let mut stopped_early = false;

        for epoch in 1..=config.epochs {
            epochs_run = epoch;
            order.shuffle(&mut rng);

            let mut train_loss = 0.0;
            for batch in order.chunks(config.batch_size) {
                let x = train_x.select(Axis(0), batch);
                let y = train_y.select(Axis(0), batch);

                let logits = network.forward_train(x, &mut rng).column(0).to_owned();
                train_loss += bce_from_logits(logits.view(), y.view()) * batch.len() as f32;

                network.backward(bce_gradient(logits.view(), y.view()));
                network.apply_gradients(&mut adam);
            }
            train_loss /= split_at as f32;

            let val_loss = bce_from_logits(network.logits(val_x).view(), val_y);
            debug!(epoch, train_loss, val_loss, "Epoch complete");

            if val_loss < best_loss {
                best_loss = val_loss;
                best_epoch = epoch;
                best = network.clone();
                wait = 0;
            } else {
                wait += 1;
                if wait >= config.patience {
                    stopped_early = true;
                    break;
                }
            }
        }

        // NaN losses never compare as an improvement
        if best_epoch == 0 {
            return Err(ClassifierError::NonFiniteLoss { epochs: epochs_run });
        }

        // Keep the best-validation weights even if we never stopped early
        let network = best;

        let val_scores = network.predict(val_x).to_vec();
        let val_labels = &labels[split_at..];
        let correct = val_scores
            .iter()
            .zip(val_labels)
            .filter(|&(&s, &l)| u8::from(s >= 0.5) == l)
            .count();

        let report = TrainingReport {
            epochs_run,
            best_epoch,
            best_validation_loss: best_loss,
            stopped_early,
            training_rows: split_at,
            validation_rows: rows - split_at,
            validation_accuracy: correct as f32 / val_labels.len() as f32,
            validation_auc: roc_auc(&val_scores, val_labels),
        };

        info!(
            epochs_run = report.epochs_run,
            best_epoch = report.best_epoch,
            stopped_early = report.stopped_early,
            best_validation_loss = report.best_validation_loss,
            "Training finished"
        );

        Ok((
            Self {
                network,
                config: config.clone(),
            },
            report,
        ))
    }

    /// Probability of the positive class for each row
    pub fn score(&self, features: ArrayView2<'_, f32>) -> Result<Vec<f32>> {
        if features.ncols() != self.network.input_width() {
            return Err(ClassifierError::WidthMismatch {
                expected: self.network.input_width(),
                found: features.ncols(),
            });
        }
        if features.nrows() == 0 {
            return Ok(Vec::new());
        }
        Ok(self.network.predict(features).to_vec())
    }

    pub fn config(&self) -> &ClassifierConfig {
        &self.config
    }
}

impl Scorer for Classifier {
    fn score(&self, features: ArrayView2<'_, f32>) -> Result<Vec<f32>> {
        Classifier::score(self, features)
    }

    fn input_width(&self) -> usize {
        self.network.input_width()
    }
}

fn check_inputs(features: ArrayView2<'_, f32>, labels: &[u8]) -> Result<()> {
    if features.ncols() == 0 {
        return Err(ClassifierError::EmptyFeatures);
    }
    if features.nrows() != labels.len() {
        return Err(ClassifierError::RowCountMismatch {
            features: features.nrows(),
            labels: labels.len(),
        });
    }
    if let Some((row, &value)) = labels.iter().enumerate().find(|&(_, &l)| l > 1) {
        return Err(ClassifierError::InvalidLabel { row, value });
    }
    Ok(())
}
