use anyhow::{bail, Result};
use burn::{
    module::Param,
    nn::{
        conv::{Conv1d, Conv1dConfig},
        loss::BinaryCrossEntropyLossConfig,
        pool::{MaxPool1d, MaxPool1dConfig},
        Embedding, EmbeddingConfig,
        Linear, LinearConfig,
    },
    prelude::*,
    tensor::{
        activation::{relu, sigmoid},
        TensorData,
    },
};

use crate::domain::vocabulary::EmbeddingMatrix;

// Architecture constants, not tunable.
pub const CONV_FILTERS: [usize; 3] = [32, 32, 64];
pub const KERNEL_SIZES: [usize; 3] = [5, 4, 3];
pub const POOL_SIZE: usize = 3;
pub const DENSE_UNITS: usize = 64;

#[derive(Config, Debug)]
pub struct TextCnnConfig {
    /// Embedding rows, reserved padding/unknown rows included
    pub vocab_rows:    usize,
    pub embedding_dim: usize,
    pub max_seq_len:   usize,
}

impl TextCnnConfig {
    /// Width of the flattened conv output, or None when the
    /// sequence is too short to survive the three conv+pool blocks.
    pub fn feature_len(&self) -> Option<usize> {
        let mut len = self.max_seq_len;
        for kernel in KERNEL_SIZES {
            // valid convolution, then pool with stride == size
            len = len.checked_sub(kernel - 1)?;
            if len < POOL_SIZE {
                return None;
            }
            len /= POOL_SIZE;
        }
        Some(len * CONV_FILTERS[2])
    }

    /// Build the network with `embeddings` moved into a frozen lookup table.
    pub fn init<B: Backend>(
        &self,
        embeddings: EmbeddingMatrix,
        device:     &B::Device,
    ) -> Result<TextCnn<B>> {
        if embeddings.rows() != self.vocab_rows || embeddings.dim() != self.embedding_dim {
            bail!(
                "embedding matrix is {} x {}, model expects {} x {}",
                embeddings.rows(),
                embeddings.dim(),
                self.vocab_rows,
                self.embedding_dim,
            );
        }
        let Some(feature_len) = self.feature_len() else {
            bail!(
                "sequence length {} is too short for kernels {:?} with pool size {}",
                self.max_seq_len,
                KERNEL_SIZES,
                POOL_SIZE,
            );
        };

        let weights = Tensor::<B, 2>::from_data(
            TensorData::new(embeddings.into_values(), [self.vocab_rows, self.embedding_dim]),
            device,
        );
        let mut embedding = EmbeddingConfig::new(self.vocab_rows, self.embedding_dim).init(device);
        embedding.weight = Param::from_tensor(weights);
        let embedding = embedding.no_grad();

        let conv1 = Conv1dConfig::new(self.embedding_dim, CONV_FILTERS[0], KERNEL_SIZES[0]).init(device);
        let conv2 = Conv1dConfig::new(CONV_FILTERS[0], CONV_FILTERS[1], KERNEL_SIZES[1]).init(device);
        let conv3 = Conv1dConfig::new(CONV_FILTERS[1], CONV_FILTERS[2], KERNEL_SIZES[2]).init(device);
        let pool  = MaxPool1dConfig::new(POOL_SIZE).with_stride(POOL_SIZE).init();

        let dense  = LinearConfig::new(feature_len, DENSE_UNITS).init(device);
        let output = LinearConfig::new(DENSE_UNITS, 1).init(device);

        Ok(TextCnn { embedding, conv1, conv2, conv3, pool, dense, output })
    }
}

#[derive(Module, Debug)]
pub struct TextCnn<B: Backend> {
    pub embedding: Embedding<B>,
    pub conv1:     Conv1d<B>,
    pub conv2:     Conv1d<B>,
    pub conv3:     Conv1d<B>,
    pub pool:      MaxPool1d,
    pub dense:     Linear<B>,
    pub output:    Linear<B>,
}

impl<B: Backend> TextCnn<B> {
    /// token_ids: [batch, seq_len] → [batch, seq_len, embedding_dim]
    pub fn embed(&self, token_ids: Tensor<B, 2, Int>) -> Tensor<B, 3> {
        self.embedding.forward(token_ids)
    }

    /// token_ids: [batch, seq_len] → pre-sigmoid scores [batch]
    pub fn forward_logits(&self, token_ids: Tensor<B, 2, Int>) -> Tensor<B, 1> {
        let [batch_size, _] = token_ids.dims();

        // Conv1d wants channels first: [batch, embedding_dim, seq_len]
        let x = self.embed(token_ids).swap_dims(1, 2);

        let x = self.pool.forward(relu(self.conv1.forward(x)));
        let x = self.pool.forward(relu(self.conv2.forward(x)));
        let x = self.pool.forward(relu(self.conv3.forward(x)));

        let x: Tensor<B, 2> = x.flatten(1, 2);
        let x = relu(self.dense.forward(x));

        self.output.forward(x).reshape([batch_size])
    }

    /// Probability of label 1 for each sequence, shape [batch]
    pub fn forward(&self, token_ids: Tensor<B, 2, Int>) -> Tensor<B, 1> {
        sigmoid(self.forward_logits(token_ids))
    }

    /// Mean binary cross-entropy plus the logits it was computed from.
    pub fn loss(
        &self,
        token_ids: Tensor<B, 2, Int>,
        labels:    Tensor<B, 1, Int>,
    ) -> (Tensor<B, 1>, Tensor<B, 1>) {
        let logits = self.forward_logits(token_ids);
        let bce = BinaryCrossEntropyLossConfig::new()
            .with_logits(true)
            .init(&logits.device());
        let loss = bce.forward(logits.clone(), labels);
        (loss, logits)
    }
}
