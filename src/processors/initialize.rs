//! Registry Initialization Processor
//!
//! Creates the registry state PDA and stores the collaborator configuration.
//! Runs once; the program upgrade authority is the only valid initializer.

use solana_program::{
    account_info::{next_account_info, AccountInfo},
    entrypoint::ProgramResult,
    msg,
    program::invoke_signed,
    program_pack::Pack,
    pubkey::Pubkey,
    system_instruction,
    sysvar::{rent::Rent, Sysvar},
};
use spl_token::state::Mint;

use crate::{
    constants::{INITIAL_STATE_ACCOUNT_SIZE, REGISTRY_STATE_SEED_PREFIX},
    error::RegistryError,
    registry::{InitializeParams, Registry},
    state::{registry_state_address, vault_authority_address},
    utils::{
        program_authority::validate_program_upgrade_authority,
        reentrancy_protection::unpack_token_account,
        serialization::serialize_to_account,
        validation::{validate_address, validate_signer, validate_system_program, validate_writable},
    },
};

/// Processes `InitializeRegistry`.
///
/// # Accounts
/// - [0] Upgrade authority (signer, writable, pays for the state account)
/// - [1] Registry State PDA (writable)
/// - [2] System Program
/// - [3] Vault authority PDA
/// - [4] Vault token account
/// - [5] Program data account
/// - [6] Governance token mint (decimals are read from it)
pub fn process_initialize_registry(
    program_id: &Pubkey,
    accounts: &[AccountInfo],
    params: InitializeParams,
) -> ProgramResult {
    msg!("🚀 INITIALIZE RELAYER REGISTRY");

    let account_info_iter = &mut accounts.iter();
    let authority = next_account_info(account_info_iter)?;            // Index 0: Upgrade authority
    let registry_state = next_account_info(account_info_iter)?;       // Index 1: Registry State PDA
    let system_program = next_account_info(account_info_iter)?;       // Index 2: System Program
    let vault_authority = next_account_info(account_info_iter)?;      // Index 3: Vault authority PDA
    let vault = next_account_info(account_info_iter)?;                // Index 4: Vault token account
    let program_data_account = next_account_info(account_info_iter)?; // Index 5: Program data account
    let token_mint = next_account_info(account_info_iter)?;           // Index 6: Governance token mint

    msg!("⏳ Step 1/4: Validating initializer");
    validate_signer(authority, "Upgrade authority")?;
    validate_writable(registry_state, "Registry state")?;
    validate_system_program(system_program)?;
    validate_program_upgrade_authority(program_id, program_data_account, authority)?;

    msg!("⏳ Step 2/4: Validating PDAs and vault");
    let (state_address, state_bump) = registry_state_address(program_id);
    let (authority_address, authority_bump) = vault_authority_address(program_id);
    validate_address(registry_state, &state_address, "Registry state PDA")?;
    validate_address(vault_authority, &authority_address, "Vault authority PDA")?;

    if registry_state.owner == program_id {
        msg!("❌ Registry state account already exists");
        return Err(RegistryError::AlreadyInitialized.into());
    }

    let vault_account = unpack_token_account(vault)?;
    if vault_account.owner != authority_address || vault_account.mint != params.token_mint {
        msg!("❌ Vault must be a {} token account owned by {}", params.token_mint, authority_address);
        return Err(RegistryError::InvalidExternalAccount.into());
    }

    validate_address(token_mint, &params.token_mint, "Governance token mint")?;
    if token_mint.owner != &spl_token::id() {
        msg!("❌ Governance token mint is not owned by the SPL Token program");
        return Err(RegistryError::InvalidExternalAccount.into());
    }
    let token_decimals = Mint::unpack_from_slice(&token_mint.data.borrow())?.decimals;
    msg!("🪙 Governance token decimals: {}", token_decimals);

    msg!("⏳ Step 3/4: Creating registry state account");
    let rent = Rent::get()?;
    invoke_signed(
        &system_instruction::create_account(
            authority.key,
            registry_state.key,
            rent.minimum_balance(INITIAL_STATE_ACCOUNT_SIZE),
            INITIAL_STATE_ACCOUNT_SIZE as u64,
            program_id,
        ),
        &[authority.clone(), registry_state.clone(), system_program.clone()],
        &[&[REGISTRY_STATE_SEED_PREFIX, &[state_bump]]],
    )?;
    msg!("✅ Registry state PDA created: {}", registry_state.key);

    msg!("⏳ Step 4/4: Writing configuration");
    let mut registry = Registry::default();
    registry.governance.registry_state_bump = state_bump;
    registry.governance.vault_authority_bump = authority_bump;
    registry.initialize(&params, *vault.key, token_decimals)?;
    serialize_to_account(&registry, registry_state, authority, system_program)?;

    msg!("🎉 REGISTRY INITIALIZED");
    msg!("   • Governance: {}", params.governance);
    msg!("   • Withdrawal router: {}", params.withdrawal_router);
    msg!("   • Stake source: {}", params.stake_source);
    msg!("   • Token mint: {}", params.token_mint);
    msg!("   • Vault: {}", vault.key);
    msg!("   • Minimum stake: {}", registry.ledger.min_stake_amount);
    Ok(())
}
