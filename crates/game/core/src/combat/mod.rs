//! Combat resolution system.
//!
//! Pure functions and declarative templates for resolving damage:
//!
//! - [`Spell`]: stateless spell template with level scaling
//! - [`DamageResolver`]: the layered damage pipeline
//! - [`effect`]: area geometry and atomic application of hits

pub mod damage;
pub mod effect;
pub mod element;
pub mod spell;

pub use damage::{DamageResolver, apply_damage, apply_falloff};
pub use effect::{EffectError, Hit, HitReport, affected_cells, apply_hits, plan_hits};
pub use element::Element;
pub use spell::{DamageRange, EffectShape, Spell, SpellError, SpellId};
