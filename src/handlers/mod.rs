// Two security tiers: public (no auth, /auth/* and service meta) and
// protected (JWT required, everything under /api/*).
pub mod protected;
pub mod public;
