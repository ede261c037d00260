//! Derived pokemon metrics used in hatch signals.

use crate::model::Pokemon;

/// Combat power multiplier for levels 1 through 40.
const CP_MULTIPLIERS: [f64; 40] = [
    0.094, 0.166_397_87, 0.215_732_47, 0.255_720_05, 0.290_249_88, 0.321_087_6, 0.349_212_68,
    0.375_235_59, 0.399_567_28, 0.422_500_01, 0.443_107_55, 0.462_798_39, 0.481_684_95,
    0.499_858_44, 0.517_393_95, 0.534_354_33, 0.550_792_69, 0.566_754_52, 0.582_278_91,
    0.597_400_01, 0.612_157_29, 0.626_567_13, 0.640_652_95, 0.654_435_63, 0.667_934,
    0.681_164_92, 0.694_143_65, 0.706_884_21, 0.719_399_09, 0.731_7, 0.737_769_48, 0.743_789_43,
    0.749_761_04, 0.755_685_51, 0.761_563_84, 0.767_397_17, 0.773_186_5, 0.778_932_75,
    0.784_636_97, 0.790_300_01,
];

/// Highest level reachable by a pokemon.
pub const MAX_LEVEL: f64 = 40.0;

/// Sum of the best possible individual values.
const MAX_IV_TOTAL: f64 = 45.0;

/// Multiplier for a whole or half level. Half levels sit between their
/// neighbours on a squared scale.
fn multiplier_for(level_x2: usize) -> f64 {
    let idx = level_x2 / 2 - 1;
    if level_x2 % 2 == 0 {
        CP_MULTIPLIERS[idx]
    } else {
        let lo = CP_MULTIPLIERS[idx];
        let hi = CP_MULTIPLIERS[idx + 1];
        ((lo * lo + hi * hi) / 2.0).sqrt()
    }
}

/// Level whose multiplier is closest to `total_multiplier`, in half-level steps.
pub fn level_from_multiplier(total_multiplier: f64) -> f64 {
    let mut best = (2usize, f64::MAX);
    for level_x2 in 2..=(MAX_LEVEL as usize * 2) {
        let distance = (multiplier_for(level_x2) - total_multiplier).abs();
        if distance < best.1 {
            best = (level_x2, distance);
        }
    }
    best.0 as f64 / 2.0
}

/// Current level of a pokemon.
pub fn level(pokemon: &Pokemon) -> f64 {
    level_from_multiplier(pokemon.cp_multiplier + pokemon.additional_cp_multiplier)
}

/// CP the pokemon would have at the maximum level.
pub fn max_cp(pokemon: &Pokemon) -> i32 {
    let attack = f64::from(pokemon.base_attack) + f64::from(pokemon.individual_attack);
    let defense = f64::from(pokemon.base_defense) + f64::from(pokemon.individual_defense);
    let stamina = f64::from(pokemon.base_stamina) + f64::from(pokemon.individual_stamina);
    let cpm = CP_MULTIPLIERS[CP_MULTIPLIERS.len() - 1];

    let cp = (attack * defense.sqrt() * stamina.sqrt() * cpm * cpm / 10.0).floor();
    (cp as i32).max(10)
}

/// Individual value perfection in percent, rounded to two decimal places.
pub fn perfection(pokemon: &Pokemon) -> f64 {
    let total = f64::from(pokemon.individual_attack)
        + f64::from(pokemon.individual_defense)
        + f64::from(pokemon.individual_stamina);
    round2(total / MAX_IV_TOTAL * 100.0)
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
