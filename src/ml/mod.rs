// ============================================================
// Layer 5 — ML / Model Layer (Burn)
// ============================================================
// All Burn tensor and autodiff code lives in this layer and in
// the batcher that feeds it.
//
//   model.rs      — basic recurrent cell + dense head; per-step or
//                   final-state logits; mean cross-entropy loss
//
//   trainer.rs    — optimizer steps, evaluation, and the
//                   Initialized → Training ⇄ Evaluating lifecycle
//
//   inferencer.rs — frozen model, argmax labels per position
//
// Reference: Burn Book §3 (Building Blocks)
//            Burn Book §5 (Training)
//            Elman (1990) Finding Structure in Time

/// Recurrent sequence classifier architecture
pub mod model;

/// Training loop with periodic evaluation
pub mod trainer;

/// Inference engine — predicts 0/1 labels
pub mod inferencer;
