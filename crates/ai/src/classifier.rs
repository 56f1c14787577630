//! Training: binary cross-entropy minimized with Adam.

use ndarray::{Array, Array1, Array2, Axis, Dimension};
use rand::seq::SliceRandom;
use rand::Rng;
use tracing::debug;

use crate::corpus::TrainingCorpus;
use crate::error::TrainingError;
use crate::model::{relu, sigmoid, ReorderModel, HIDDEN_UNITS, INPUT_FEATURES};

/// Training hyperparameters.
#[derive(Debug, Clone)]
pub struct TrainConfig {
    epochs: usize,
    batch_size: usize,
    learning_rate: f64,
}

impl Default for TrainConfig {
    fn default() -> Self {
        Self {
            epochs: 20,
            batch_size: 32,
            learning_rate: 1e-3,
        }
    }
}

impl TrainConfig {
    pub fn with_epochs(mut self, epochs: usize) -> Self {
        self.epochs = epochs;
        self
    }

    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size;
        self
    }

    pub fn with_learning_rate(mut self, learning_rate: f64) -> Self {
        self.learning_rate = learning_rate;
        self
    }

    pub fn epochs(&self) -> usize {
        self.epochs
    }
}

/// The trainable reorder classifier.
pub struct Classifier;

impl Classifier {
    /// Fit a fresh model on `corpus`.
    ///
    /// One hidden layer of [`HIDDEN_UNITS`] ReLU units into a sigmoid output,
    /// minimizing binary cross-entropy with Adam; example order is reshuffled
    /// every epoch. Weights start Glorot-uniform from the injected rng, so a
    /// seeded rng makes training reproducible.
    ///
    /// All intermediate batch buffers are owned by this call frame and
    /// released on every exit path, success or error.
    pub fn train<R: Rng + ?Sized>(
        corpus: &TrainingCorpus,
        config: &TrainConfig,
        rng: &mut R,
    ) -> Result<ReorderModel, TrainingError> {
        if corpus.is_empty() {
            return Err(TrainingError::EmptyCorpus);
        }
        if corpus.features.len() != corpus.labels.len() {
            return Err(TrainingError::CorpusMismatch {
                features: corpus.features.len(),
                labels: corpus.labels.len(),
            });
        }

        let n = corpus.features.len();
        let batch_size = config.batch_size.max(1);

        // Materialize the corpus once; minibatches gather rows out of these.
        let mut x = Array2::<f64>::zeros((n, INPUT_FEATURES));
        let mut y = Array2::<f64>::zeros((n, 1));
        for (row, (f, label)) in corpus.features.iter().zip(&corpus.labels).enumerate() {
            let [inv, sales, lead] = f.as_array();
            x[[row, 0]] = inv;
            x[[row, 1]] = sales;
            x[[row, 2]] = lead;
            y[[row, 0]] = *label;
        }

        let mut model = ReorderModel {
            w1: glorot_uniform(INPUT_FEATURES, HIDDEN_UNITS, rng),
            b1: Array1::zeros(HIDDEN_UNITS),
            w2: glorot_uniform(HIDDEN_UNITS, 1, rng),
            b2: Array1::zeros(1),
        };
        let mut optimizer = Adam::new(config.learning_rate);

        let mut order: Vec<usize> = (0..n).collect();
        for epoch in 0..config.epochs {
            order.shuffle(rng);

            let mut loss_sum = 0.0;
            for chunk in order.chunks(batch_size) {
                let m = chunk.len();
                let mut xb = Array2::<f64>::zeros((m, INPUT_FEATURES));
                let mut yb = Array2::<f64>::zeros((m, 1));
                for (row, &idx) in chunk.iter().enumerate() {
                    xb.row_mut(row).assign(&x.row(idx));
                    yb[[row, 0]] = y[[idx, 0]];
                }

                // Forward.
                let z1 = xb.dot(&model.w1) + &model.b1;
                let a1 = z1.mapv(relu);
                let z2 = a1.dot(&model.w2) + &model.b2;
                let p = z2.mapv(sigmoid);

                loss_sum += bce_sum(&p, &yb);

                // Backward. Sigmoid + BCE collapse to (p - y) at the output.
                let dz2 = (&p - &yb) / m as f64;
                let dw2 = a1.t().dot(&dz2);
                let db2 = dz2.sum_axis(Axis(0));
                let da1 = dz2.dot(&model.w2.t());
                let dz1 = &da1 * &z1.mapv(|v| if v > 0.0 { 1.0 } else { 0.0 });
                let dw1 = xb.t().dot(&dz1);
                let db1 = dz1.sum_axis(Axis(0));

                optimizer.step(&mut model, &dw1, &db1, &dw2, &db2);
            }

            let mean_loss = loss_sum / n as f64;
            if !mean_loss.is_finite() {
                return Err(TrainingError::Diverged { epoch });
            }
            debug!(epoch, loss = mean_loss, "training epoch complete");
        }

        Ok(model)
    }
}

fn glorot_uniform<R: Rng + ?Sized>(rows: usize, cols: usize, rng: &mut R) -> Array2<f64> {
    let limit = (6.0 / (rows + cols) as f64).sqrt();
    Array2::from_shape_fn((rows, cols), |_| rng.gen_range(-limit..limit))
}

/// Binary cross-entropy, summed over the batch. Probabilities are clamped
/// away from 0 and 1 so the logs stay finite.
fn bce_sum(p: &Array2<f64>, y: &Array2<f64>) -> f64 {
    const EPS: f64 = 1e-7;
    p.iter()
        .zip(y.iter())
        .map(|(&p, &y)| {
            let p = p.clamp(EPS, 1.0 - EPS);
            -(y * p.ln() + (1.0 - y) * (1.0 - p).ln())
        })
        .sum()
}

/// Adam optimizer state, one first/second moment pair per parameter tensor.
struct Adam {
    learning_rate: f64,
    t: i32,
    m_w1: Array2<f64>,
    v_w1: Array2<f64>,
    m_b1: Array1<f64>,
    v_b1: Array1<f64>,
    m_w2: Array2<f64>,
    v_w2: Array2<f64>,
    m_b2: Array1<f64>,
    v_b2: Array1<f64>,
}

impl Adam {
    fn new(learning_rate: f64) -> Self {
        Self {
            learning_rate,
            t: 0,
            m_w1: Array2::zeros((INPUT_FEATURES, HIDDEN_UNITS)),
            v_w1: Array2::zeros((INPUT_FEATURES, HIDDEN_UNITS)),
            m_b1: Array1::zeros(HIDDEN_UNITS),
            v_b1: Array1::zeros(HIDDEN_UNITS),
            m_w2: Array2::zeros((HIDDEN_UNITS, 1)),
            v_w2: Array2::zeros((HIDDEN_UNITS, 1)),
            m_b2: Array1::zeros(1),
            v_b2: Array1::zeros(1),
        }
    }

    fn step(
        &mut self,
        model: &mut ReorderModel,
        dw1: &Array2<f64>,
        db1: &Array1<f64>,
        dw2: &Array2<f64>,
        db2: &Array1<f64>,
    ) {
        self.t += 1;
        let lr = self.learning_rate;
        let t = self.t;
        adam_update(&mut model.w1, dw1, &mut self.m_w1, &mut self.v_w1, lr, t);
        adam_update(&mut model.b1, db1, &mut self.m_b1, &mut self.v_b1, lr, t);
        adam_update(&mut model.w2, dw2, &mut self.m_w2, &mut self.v_w2, lr, t);
        adam_update(&mut model.b2, db2, &mut self.m_b2, &mut self.v_b2, lr, t);
    }
}

fn adam_update<D: Dimension>(
    param: &mut Array<f64, D>,
    grad: &Array<f64, D>,
    m: &mut Array<f64, D>,
    v: &mut Array<f64, D>,
    learning_rate: f64,
    t: i32,
) {
    const BETA1: f64 = 0.9;
    const BETA2: f64 = 0.999;
    const EPSILON: f64 = 1e-8;

    *m = &*m * BETA1 + &(grad * (1.0 - BETA1));
    *v = &*v * BETA2 + &(grad.mapv(|g| g * g) * (1.0 - BETA2));

    let m_hat = &*m / (1.0 - BETA1.powi(t));
    let v_hat = &*v / (1.0 - BETA2.powi(t));

    *param -= &(m_hat / (v_hat.mapv(f64::sqrt) + EPSILON) * learning_rate);
}
