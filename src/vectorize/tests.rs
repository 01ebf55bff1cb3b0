use super::*;

mod cosine_tests {
    use super::*;

    #[test]
    fn test_cosine_identical_vectors() {
        let a = vec![1.0, 2.0, 3.0];
        let sim = cosine_similarity(&a, &a, 0.0).expect("non-zero");
        assert!((sim - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_cosine_orthogonal_vectors() {
        let a = vec![1.0, 0.0];
        let b = vec![0.0, 1.0];
        assert_eq!(cosine_similarity(&a, &b, 0.0), Some(0.0));
    }

    #[test]
    fn test_cosine_zero_vector_is_none() {
        let a = vec![0.0, 0.0];
        let b = vec![1.0, 0.0];
        assert!(cosine_similarity(&a, &b, 1e-8).is_none());
        assert!(cosine_similarity(&b, &a, 1e-8).is_none());
    }

    #[test]
    fn test_cosine_sparse_matches_dense() {
        let a = SparseVector::new(4, vec![(0, 1.0), (3, 2.0)]);
        let b = SparseVector::new(4, vec![(0, 2.0), (1, 1.0), (3, 1.0)]);
        let sparse = cosine_similarity(&a, &b, 0.0).expect("non-zero");
        let dense = cosine_similarity(&a.to_dense(), &b.to_dense(), 0.0).expect("non-zero");
        assert!((sparse - dense).abs() < 1e-6);
    }
}

mod tfidf_tests {
    use super::*;

    fn corpus() -> Vec<&'static str> {
        vec![
            "machine learning vision",
            "networks security",
            "security cryptography",
        ]
    }

    #[test]
    fn test_vocabulary_sorted() {
        let tfidf = TfidfVectorizer::fit(&corpus());
        assert_eq!(
            tfidf.terms(),
            &[
                "cryptography",
                "learning",
                "machine",
                "networks",
                "security",
                "vision"
            ]
        );
        assert_eq!(tfidf.dim(), 6);
        assert_eq!(tfidf.index_of("networks"), Some(3));
        assert_eq!(tfidf.index_of("biology"), None);
    }

    #[test]
    fn test_idf_smoothed() {
        let tfidf = TfidfVectorizer::fit(&corpus());
        // n = 3; "security" in 2 docs, "vision" in 1.
        let security = tfidf.idf("security").expect("in vocab");
        let vision = tfidf.idf("vision").expect("in vocab");
        assert!((security - ((4.0f32 / 3.0).ln() + 1.0)).abs() < 1e-6);
        assert!((vision - (2.0f32.ln() + 1.0)).abs() < 1e-6);
        assert!(vision > security);
    }

    #[test]
    fn test_vectorize_is_l2_normalized() {
        let tfidf = TfidfVectorizer::fit(&corpus());
        let v = tfidf.vectorize("security networks networks");
        assert_eq!(v.nnz(), 2);
        assert!((v.norm() - 1.0).abs() < 1e-5);
        // Twice the count of "networks" weighs it above "security".
        assert!(v.get(3) > v.get(4));
    }

    #[test]
    fn test_unseen_terms_contribute_nothing() {
        let tfidf = TfidfVectorizer::fit(&corpus());
        let v = tfidf.vectorize("biology chemistry");
        assert!(v.is_zero());
        assert_eq!(v.dim(), tfidf.dim());
    }

    #[test]
    fn test_empty_corpus() {
        let empty: Vec<String> = Vec::new();
        let tfidf = TfidfVectorizer::fit(&empty);
        assert_eq!(tfidf.vocabulary_size(), 0);
        assert!(tfidf.vectorize("anything here").is_zero());
    }
}

mod embedding_tests {
    use super::*;

    fn corpus() -> Vec<&'static str> {
        vec![
            "machine learning neural networks deep learning",
            "computer vision neural networks image recognition",
            "network security cryptography privacy",
            "distributed systems cloud computing networks",
        ]
    }

    fn small_config() -> EmbeddingConfig {
        EmbeddingConfig::default().with_dim(16).with_epochs(3)
    }

    #[test]
    fn test_config_defaults() {
        let config = EmbeddingConfig::default();
        assert_eq!(config.dim, 100);
        assert_eq!(config.window, 5);
        assert_eq!(config.min_count, 1);
        assert_eq!(config.negative, 5);
        assert_eq!(config.epochs, 5);
        assert_eq!(config.seed, 42);
        assert_eq!(config.mode, TrainingMode::Cbow);
    }

    #[test]
    fn test_training_is_deterministic() {
        let a = EmbeddingVectorizer::fit(&corpus(), &small_config());
        let b = EmbeddingVectorizer::fit(&corpus(), &small_config());
        assert_eq!(a.word_vector("neural"), b.word_vector("neural"));
        assert_eq!(a.vectorize("vision security"), b.vectorize("vision security"));
    }

    #[test]
    fn test_seed_changes_vectors() {
        let a = EmbeddingVectorizer::fit(&corpus(), &small_config());
        let b = EmbeddingVectorizer::fit(&corpus(), &small_config().with_seed(7));
        assert_ne!(a.word_vector("neural"), b.word_vector("neural"));
    }

    #[test]
    fn test_vectorize_is_mean_of_known_tokens() {
        let model = EmbeddingVectorizer::fit(&corpus(), &small_config());
        let a = model.word_vector("privacy").expect("in vocab").to_vec();
        let b = model.word_vector("cloud").expect("in vocab").to_vec();
        let mean = model.vectorize("privacy cloud unknownword");
        for i in 0..model.dim() {
            assert!((mean[i] - (a[i] + b[i]) / 2.0).abs() < 1e-6);
        }
    }

    #[test]
    fn test_vectorize_unknown_text_is_zero() {
        let model = EmbeddingVectorizer::fit(&corpus(), &small_config());
        let v = model.vectorize("zebra giraffe");
        assert_eq!(v.len(), 16);
        assert!(v.is_zero());
    }

    #[test]
    fn test_vocabulary_excludes_stopwords() {
        let model = EmbeddingVectorizer::fit(&["the theory of everything"], &small_config());
        assert!(model.contains("theory"));
        assert!(model.contains("everything"));
        assert!(!model.contains("the"));
        assert_eq!(model.vocabulary_size(), 2);
    }

    #[test]
    fn test_skipgram_trains() {
        let config = small_config().with_mode(TrainingMode::SkipGram);
        let model = EmbeddingVectorizer::fit(&corpus(), &config);
        let v = model.vectorize("neural networks");
        assert!(!v.is_zero());
        assert!(v.iter().all(|x| x.is_finite()));
    }

    #[test]
    fn test_empty_corpus_yields_zero_vectors() {
        let empty: Vec<String> = Vec::new();
        let model = EmbeddingVectorizer::fit(&empty, &small_config());
        assert_eq!(model.vocabulary_size(), 0);
        assert!(model.vectorize("anything").is_zero());
    }
}
