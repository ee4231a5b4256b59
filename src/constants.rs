//! Program-wide constants: PDA seeds, fixed-point scales and default parameters.

/// Seed prefix for the registry state PDA
///
/// Derivation: `[REGISTRY_STATE_SEED_PREFIX]`
pub const REGISTRY_STATE_SEED_PREFIX: &[u8] = b"registry_state";

/// Seed prefix for the PDA that owns the governance token vault
///
/// Derivation: `[VAULT_AUTHORITY_SEED_PREFIX]`
pub const VAULT_AUTHORITY_SEED_PREFIX: &[u8] = b"vault_authority";

/// Seed prefix for per-relayer record PDAs
///
/// Derivation: `[RELAYER_RECORD_SEED_PREFIX, relayer]`
pub const RELAYER_RECORD_SEED_PREFIX: &[u8] = b"relayer";

/// Seed prefix for sub-address binding PDAs
///
/// Derivation: `[SUBADDRESS_RECORD_SEED_PREFIX, address]`
pub const SUBADDRESS_RECORD_SEED_PREFIX: &[u8] = b"subaddress";

/// Seed prefix for identity claim PDAs
///
/// Derivation: `[IDENTITY_RECORD_SEED_PREFIX, identity]`
pub const IDENTITY_RECORD_SEED_PREFIX: &[u8] = b"identity";

/// Seed prefix for per-staker stake account PDAs
///
/// Derivation: `[STAKE_ACCOUNT_SEED_PREFIX, staker]`
pub const STAKE_ACCOUNT_SEED_PREFIX: &[u8] = b"stake_account";

/// Fixed-point scale of the reward-per-token accumulator
pub const SCALE: u128 = 1_000_000_000_000_000_000;

/// Fixed-point scale of oracle prices (18 decimals, native unit = `PRICE_SCALE`)
pub const PRICE_SCALE: u128 = 1_000_000_000_000_000_000;

/// Divider for protocol fee basis points
pub const FEE_DIVIDER: u128 = 10_000;

/// Governance token decimals assumed before a mint has been read
pub const DEFAULT_GOVERNANCE_TOKEN_DECIMALS: u8 = 9;

/// Minimum registration stake in whole governance tokens, applied when none is configured
pub const DEFAULT_MIN_STAKE_TOKENS: u64 = 100;

/// Largest mint decimals the fee formula accepts
pub const MAX_TOKEN_DECIMALS: u8 = 24;

/// Upper bound on registered pools; keeps the registry state account bounded
pub const MAX_POOLS: usize = 64;

/// Default TWAP window in seconds
pub const DEFAULT_TWAP_PERIOD: u32 = 5_400;

/// Default fee tier of the governance token price feed
pub const DEFAULT_GOVERNANCE_FEE_TIER: u32 = 10_000;

/// Default age after which a pool fee is refreshed before charging
pub const DEFAULT_FEE_UPDATE_INTERVAL: i64 = 6 * 60 * 60;

/// Upper bound on advertised relayer fees
pub const MAX_RELAYER_FEE_RATE_BPS: u16 = 10_000;

/// Upper bound on per-pool protocol fees
pub const MAX_PROTOCOL_FEE_BPS: u32 = 10_000;

/// Size of the registry state account when first created
pub const INITIAL_STATE_ACCOUNT_SIZE: usize = 4_096;
