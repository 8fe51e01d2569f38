//! Engine tuning constants with documented values
//!
//! All non-governable magic numbers are collected here with explanations of
//! their purpose and how they interact with each other. These are engine
//! guarantees and calibration values; anything the league can vote on lives
//! in the `rules` module instead.

/// Tuning values for the possession resolver and game orchestrator
///
/// These values have been calibrated so a default ruleset produces game
/// scores in a plausible basketball range. Changing them shifts pacing
/// and scoring but never breaks determinism.
#[derive(Debug, Clone)]
pub struct SimTuning {
    // === DEFENSE ===
    /// Lower bound of the defensive contest multiplier
    ///
    /// A perfect defender (defense = 100) scales the shooter's make
    /// probability by this factor. An absent or zero-rated defender
    /// leaves the shot uncontested (multiplier 1.0). Bounded 0.5-1.0.
    pub contest_floor: f32,

    // === SHOOTER MODIFIERS ===
    /// IQ modifier at iq = 0
    ///
    /// The IQ modifier interpolates linearly from `iq_floor` (iq = 0)
    /// to `iq_ceiling` (iq = 100) and multiplies make probability.
    pub iq_floor: f32,

    /// IQ modifier at iq = 100
    pub iq_ceiling: f32,

    /// Lower bound of the stamina modifier
    ///
    /// A fully gassed player (fatigue = 1.0) shoots at this fraction of
    /// their rested probability. Fatigue accrues per possession on court
    /// via each agent's `stamina_drain_rate`.
    pub stamina_floor: f32,

    // === SHOT DIFFICULTY ===
    /// Scoring attribute at which a three-pointer is a coin flip
    pub three_difficulty: f32,

    /// Scoring attribute at which a mid-range shot is a coin flip
    pub mid_difficulty: f32,

    /// Scoring attribute at which a layup is a coin flip
    pub layup_difficulty: f32,

    /// Scoring attribute at which a free throw is a coin flip
    ///
    /// Lower than any field-goal difficulty: free throws are uncontested.
    pub free_throw_difficulty: f32,

    /// Steepness of the logistic make-probability curve
    ///
    /// Smaller values make attribute differences matter more. At 18.0,
    /// a shooter 18 points above the difficulty makes ~73% of attempts.
    pub logistic_scale: f32,

    // === POSSESSION EVENTS ===
    /// Base chance a possession ends in a live-ball turnover
    ///
    /// Scaled by the ball handler's IQ: low-IQ offenses turn the ball
    /// over more often.
    pub base_turnover_chance: f32,

    /// Base chance a shot attempt draws a shooting foul
    pub base_foul_chance: f32,

    // === CLOCK ===
    /// Minimum seconds a possession consumes in a timed period
    ///
    /// The actual time used is drawn uniformly between this and the
    /// governable shot clock, then divided by the offense's pace.
    pub min_possession_seconds: f32,

    // === SUBSTITUTIONS & RECOVERY ===
    /// Fatigue level above which a player is substituted at a quarter break
    pub fatigue_sub_threshold: f32,

    /// Fatigue removed at an ordinary quarter break
    pub quarter_recovery: f32,

    /// Fatigue removed at the halftime break
    ///
    /// Larger than `quarter_recovery`; applied at quarter ceil(k/2) where
    /// k is the number of timed quarters.
    pub halftime_recovery: f32,

    // === TERMINATION ===
    /// Hard ceiling on total possessions per game
    ///
    /// Guarantees termination under pathological rulesets (near-zero point
    /// values, unreachable Elam targets). Reaching the cap is a flagged,
    /// valid outcome, not an error.
    pub possession_cap: u32,
}

impl Default for SimTuning {
    fn default() -> Self {
        Self {
            // Defense (contest bounded 0.5-1.0)
            contest_floor: 0.5,

            // Shooter modifiers (iq 0.9-1.1, stamina 0.7-1.0)
            iq_floor: 0.9,
            iq_ceiling: 1.1,
            stamina_floor: 0.7,

            // Shot difficulties (three > mid > layup > free throw)
            three_difficulty: 62.0,
            mid_difficulty: 50.0,
            layup_difficulty: 38.0,
            free_throw_difficulty: 30.0,
            logistic_scale: 18.0,

            // Possession events
            base_turnover_chance: 0.12,
            base_foul_chance: 0.08,

            // Clock
            min_possession_seconds: 8.0,

            // Substitutions and recovery
            fatigue_sub_threshold: 0.6,
            quarter_recovery: 0.3,
            halftime_recovery: 0.6,

            // Termination
            possession_cap: 300,
        }
    }
}

impl SimTuning {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate tuning values for internal consistency
    pub fn validate(&self) -> Result<(), String> {
        if !(0.0..=1.0).contains(&self.contest_floor) {
            return Err(format!(
                "contest_floor ({}) must be within 0.0-1.0",
                self.contest_floor
            ));
        }

        if self.iq_floor >= self.iq_ceiling {
            return Err(format!(
                "iq_floor ({}) should be < iq_ceiling ({})",
                self.iq_floor, self.iq_ceiling
            ));
        }

        if !(0.0..=1.0).contains(&self.stamina_floor) {
            return Err(format!(
                "stamina_floor ({}) must be within 0.0-1.0",
                self.stamina_floor
            ));
        }

        // Difficulty ordering: harder shots need more scoring skill
        if self.three_difficulty <= self.mid_difficulty
            || self.mid_difficulty <= self.layup_difficulty
        {
            return Err("shot difficulties must be ordered three > mid > layup".into());
        }

        if self.quarter_recovery > self.halftime_recovery {
            return Err(format!(
                "quarter_recovery ({}) should be <= halftime_recovery ({})",
                self.quarter_recovery, self.halftime_recovery
            ));
        }

        if self.possession_cap == 0 {
            return Err("possession_cap must be positive".into());
        }

        Ok(())
    }
}
