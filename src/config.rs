// ============================================================
// Run Constants
// ============================================================
// Fixed values for a training run. The CLI only exposes file
// locations; everything here is baked into the model and
// optimiser setup.

/// Every sequence is padded or truncated to this many tokens
pub const MAX_SEQUENCE_LENGTH: usize = 350;

/// Width of each pretrained word vector
pub const EMBEDDING_DIM: usize = 300;

/// Directory holding the pretrained vector file
pub const EMBEDDINGS_FILE_DIR: &str = "EmbeddingsSets";

/// Pretrained vector file name inside EMBEDDINGS_FILE_DIR
pub const EMBEDDINGS_FILE_NAME: &str = "word2vec-google-news.vec";

/// Labelled training records (JSON lines)
pub const TRAIN_FILE: &str = "emw_train.json";

/// Labelled validation records (JSON lines)
pub const DEV_FILE: &str = "emw_dev.json";

/// Where curves and the metrics CSV are written
pub const OUTPUT_DIR: &str = "reports";

// Optimiser settings
pub const LEARNING_RATE: f64 = 0.0005;
pub const EPOCHS: usize = 10;
pub const BATCH_SIZE: usize = 64;

/// Probability at or above which a prediction counts as label 1
pub const DECISION_THRESHOLD: f32 = 0.5;
