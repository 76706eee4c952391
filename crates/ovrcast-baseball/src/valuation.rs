// Liquidation values: the guaranteed quick-sell price for a card of a tier.

/// Value for any tier outside the table, including the base tier 70.
pub const QUICK_SELL_DEFAULT: u32 = 25;

/// `(tier, value)` for 75..=91, sorted by tier.
pub const LIQUIDATION_TABLE: [(u32, u32); 17] = [
    (75, 100),
    (76, 150),
    (77, 200),
    (78, 250),
    (79, 300),
    (80, 400),
    (81, 500),
    (82, 750),
    (83, 1000),
    (84, 1500),
    (85, 3000),
    (86, 3750),
    (87, 4500),
    (88, 5500),
    (89, 7000),
    (90, 8000),
    (91, 9000),
];

pub fn value_of(tier: u32) -> u32 {
    LIQUIDATION_TABLE
        .binary_search_by_key(&tier, |(t, _)| *t)
        .map(|i| LIQUIDATION_TABLE[i].1)
        .unwrap_or(QUICK_SELL_DEFAULT)
}
