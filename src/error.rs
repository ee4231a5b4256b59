use num_derive::FromPrimitive;
use num_traits::FromPrimitive as _;
use solana_program::program_error::ProgramError;
use thiserror::Error;

/// Error kinds for the relayer registry program.
///
/// Every variant maps to a stable custom program error code so clients can
/// tell a rejected registration from an oracle failure without parsing logs.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq, FromPrimitive)]
pub enum RegistryError {
    /// Caller is not allowed to perform the operation
    #[error("Unauthorized")]
    Unauthorized = 5001,

    /// Debit exceeds the relayer balance
    #[error("Insufficient balance")]
    InsufficientBalance = 5002,

    /// Relayer or identity is already registered
    #[error("Relayer already registered")]
    AlreadyRegistered = 5003,

    /// Sub-address is bound to a different relayer
    #[error("Sub-address is owned by another relayer")]
    SubaddressOwnedByOther = 5004,

    /// Registration stake is below the configured minimum
    #[error("Stake is below the minimum stake amount")]
    BelowMinimumStake = 5005,

    /// Price feed is missing, stale or inconsistent
    #[error("Price oracle unavailable")]
    OracleUnavailable = 5006,

    /// Fee computation floored to zero
    #[error("Fee computation produced zero")]
    ZeroFeeResult = 5007,

    /// Registry has already been initialized
    #[error("Registry already initialized")]
    AlreadyInitialized = 5008,

    /// Accumulator or balance went below zero
    #[error("Arithmetic underflow")]
    ArithmeticUnderflow = 5009,

    /// Checked arithmetic overflowed
    #[error("Arithmetic overflow")]
    ArithmeticOverflow = 5010,

    /// Registry has not been initialized yet
    #[error("Registry not initialized")]
    NotInitialized = 5011,

    /// No relayer is registered under the address
    #[error("Relayer not found")]
    RelayerNotFound = 5012,

    /// Sub-address is not bound to any relayer
    #[error("Sub-address not found")]
    SubaddressNotFound = 5013,

    /// A relayer cannot unbind its own address
    #[error("Cannot unregister the relayer's own address")]
    CannotUnregisterRelayer = 5014,

    /// Unknown pool id
    #[error("Pool not found")]
    PoolNotFound = 5015,

    /// Zero or otherwise invalid token amount
    #[error("Invalid amount")]
    InvalidAmount = 5016,

    /// Configuration parameter out of range
    #[error("Invalid parameter")]
    InvalidParameter = 5017,

    /// Vault transfer failed
    #[error("Token transfer failed")]
    TokenTransferFailed = 5018,

    /// Registry state account failed address or owner checks
    #[error("Invalid registry state account")]
    InvalidStateAccount = 5019,

    /// Name record or price feed account failed owner or layout checks
    #[error("Invalid external account")]
    InvalidExternalAccount = 5020,

    /// A participant record PDA the operation needs was not passed in
    #[error("Record account missing")]
    RecordAccountMissing = 5021,
}

impl RegistryError {
    /// Returns the custom program error code for this error.
    pub fn error_code(&self) -> u32 {
        *self as u32
    }

    /// Maps a custom program error code back to the error kind.
    pub fn from_code(code: u32) -> Option<Self> {
        Self::from_u32(code)
    }
}

impl From<RegistryError> for ProgramError {
    fn from(e: RegistryError) -> Self {
        ProgramError::Custom(e.error_code())
    }
}
