// ============================================================
// Layer 2 — Application / Use Cases
// ============================================================
// Orchestrates the other layers to accomplish one goal.
//
// Rules for this layer:
//   - No ML math or model code here
//   - No printing here (that's Layer 1)
//   - No direct database access (that's Layer 4)
//   - Only workflow coordination

// The full load → features → train → evaluate workflow
pub mod train_use_case;

// Load and assemble only, for inspecting the feature table
pub mod features_use_case;
