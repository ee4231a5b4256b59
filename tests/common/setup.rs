/*
MIT License

Copyright (c) 2024 Davinci

Permission is hereby granted, free of charge, to any person obtaining a copy
of this software and associated documentation files (the "Software"), to deal
in the Software without restriction, including without limitation the rights
to use, copy, modify, merge, publish, distribute, sublicense, and/or sell
copies of the Software, and to permit persons to whom the Software is
furnished to do so, subject to the following conditions:

The above copyright notice and this permission notice shall be included in all
copies or substantial portions of the Software.

THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY,
FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE
AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER
LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM,
OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE
SOFTWARE.
*/

//! # Test Environment Setup Utilities
//!
//! Starts the registry program under `solana-program-test`, creates the
//! governance token and vault, initializes the registry and offers helpers
//! to send instructions and read results back.

use std::env;

use borsh::{BorshDeserialize, BorshSerialize};
use relayer_registry::{
    client_sdk::RegistryClient,
    process_instruction,
    registry::{InitializeParams, OracleParamsUpdate, PriceObservation, Registration, Registry, Relayer, StakeAccount},
    state::{decode_record, NameRecord, PriceFeedAccount},
    RegistryError,
};
use solana_program_test::{processor, BanksClientError, ProgramTest, ProgramTestContext};
use solana_sdk::{
    account::{Account, AccountSharedData},
    clock::Clock,
    instruction::{Instruction, InstructionError},
    pubkey::Pubkey,
    signature::Keypair,
    signer::Signer,
    transaction::{Transaction, TransactionError},
};

use crate::common::{
    tokens::{create_associated_account, create_mint, fund_lamports, mint_tokens, GOVERNANCE_TOKEN_DECIMALS},
    TestResult, PROGRAM_ID,
};

pub const TEST_MIN_STAKE: u64 = 100_000_000_000;
pub const TEST_TWAP_PERIOD: u32 = 600;
pub const TEST_GOVERNANCE_FEE_TIER: u32 = 10_000;
const CALLER_LAMPORTS: u64 = 1_000_000_000;

/// Create a basic program test environment
///
/// # Returns
/// Configured ProgramTest instance running the registry natively
pub fn create_program_test() -> ProgramTest {
    ProgramTest::new("relayer_registry", PROGRAM_ID, processor!(process_instruction))
}

/// Initialized registry plus the keys of every collaborator
pub struct RegistryTestContext {
    pub context: ProgramTestContext,
    pub client: RegistryClient,
    pub mint: Keypair,
    pub governance: Keypair,
    pub router: Keypair,
    pub stake_source: Keypair,
    pub name_service_program: Pubkey,
    pub price_feed_program: Pubkey,
}

/// Start the program, create the governance token and vault, and initialize the registry
pub async fn setup_registry() -> Result<RegistryTestContext, BanksClientError> {
    setup_registry_with(GOVERNANCE_TOKEN_DECIMALS, TEST_MIN_STAKE).await
}

/// Like [`setup_registry`], for a governance mint with `decimals` decimals
/// and the given configured minimum stake
pub async fn setup_registry_with(decimals: u8, min_stake_amount: u64) -> Result<RegistryTestContext, BanksClientError> {
    env::set_var("RUST_LOG", "error,solana_runtime::message_processor::stable_log=error");
    let _ = env_logger::try_init();

    let mut context = create_program_test().start_with_context().await;
    let blockhash = context.last_blockhash;

    let mint = Keypair::new();
    create_mint(&mut context.banks_client, &context.payer, blockhash, &mint, decimals).await?;

    let governance = Keypair::new();
    let router = Keypair::new();
    let stake_source = Keypair::new();
    for keypair in [&governance, &router, &stake_source] {
        fund_lamports(&mut context.banks_client, &context.payer, blockhash, &keypair.pubkey(), CALLER_LAMPORTS).await?;
    }

    let client = RegistryClient::new(PROGRAM_ID, mint.pubkey());
    let vault_authority = client.derive_addresses().vault_authority;
    create_associated_account(&mut context.banks_client, &context.payer, blockhash, &vault_authority, &mint.pubkey())
        .await?;

    let mut test_context = RegistryTestContext {
        context,
        client,
        mint,
        governance,
        router,
        stake_source,
        name_service_program: Pubkey::new_unique(),
        price_feed_program: Pubkey::new_unique(),
    };

    let params = InitializeParams {
        governance: test_context.governance.pubkey(),
        withdrawal_router: test_context.router.pubkey(),
        stake_source: test_context.stake_source.pubkey(),
        token_mint: test_context.mint.pubkey(),
        name_service_program: test_context.name_service_program,
        price_feed_program: test_context.price_feed_program,
        min_stake_amount,
        oracle: OracleParamsUpdate {
            twap_period: Some(TEST_TWAP_PERIOD),
            governance_fee_tier: Some(TEST_GOVERNANCE_FEE_TIER),
            fee_update_interval: None,
        },
    };
    let payer = test_context.context.payer.pubkey();
    let initialize_ix = test_context.client.initialize(&payer, params).unwrap();
    test_context.process(&[initialize_ix], &[]).await?;

    Ok(test_context)
}

impl RegistryTestContext {
    /// Send `instructions` paid by the context payer and signed by `signers`
    pub async fn process(&mut self, instructions: &[Instruction], signers: &[&Keypair]) -> TestResult {
        let blockhash = self.context.get_new_latest_blockhash().await?;
        let mut all_signers: Vec<&Keypair> = vec![&self.context.payer];
        all_signers.extend_from_slice(signers);
        let transaction = Transaction::new_signed_with_payer(
            instructions,
            Some(&self.context.payer.pubkey()),
            &all_signers,
            blockhash,
        );
        self.context.banks_client.process_transaction(transaction).await
    }

    /// Simulate `instruction` and decode its little-endian `u64` return data
    pub async fn simulate_u64(&mut self, instruction: Instruction, signers: &[&Keypair]) -> Result<u64, BanksClientError> {
        let blockhash = self.context.get_new_latest_blockhash().await?;
        let mut all_signers: Vec<&Keypair> = vec![&self.context.payer];
        all_signers.extend_from_slice(signers);
        let transaction = Transaction::new_signed_with_payer(
            &[instruction],
            Some(&self.context.payer.pubkey()),
            &all_signers,
            blockhash,
        );
        let simulation = self.context.banks_client.simulate_transaction(transaction).await?;
        if let Some(Err(err)) = simulation.result {
            return Err(BanksClientError::TransactionError(err));
        }
        // Trailing zero bytes are trimmed from return data
        let data = simulation
            .simulation_details
            .and_then(|details| details.return_data)
            .map(|return_data| return_data.data)
            .unwrap_or_default();
        let mut bytes = [0u8; 8];
        bytes[..data.len()].copy_from_slice(&data);
        Ok(u64::from_le_bytes(bytes))
    }

    /// Current registry state as stored on chain
    pub async fn load_registry(&mut self) -> Registry {
        let address = self.client.derive_addresses().registry_state;
        let account = self
            .context
            .banks_client
            .get_account(address)
            .await
            .unwrap()
            .expect("registry state exists");
        Registry::deserialize(&mut &account.data[..]).unwrap()
    }

    /// Decoded record account at `address`, `None` while it does not exist
    pub async fn load_record<T: BorshDeserialize>(&mut self, address: Pubkey) -> Option<T> {
        let account = self.context.banks_client.get_account(address).await.unwrap()?;
        if account.data.is_empty() {
            return None;
        }
        assert_eq!(account.owner, PROGRAM_ID, "record owned by the registry program");
        Some(decode_record(&account.data).unwrap())
    }

    pub async fn load_relayer(&mut self, relayer: &Pubkey) -> Option<Relayer> {
        let address = self.client.relayer_record(relayer);
        self.load_record(address).await
    }

    pub async fn load_stake_account(&mut self, staker: &Pubkey) -> Option<StakeAccount> {
        let address = self.client.stake_account(staker);
        self.load_record(address).await
    }

    /// Relayer `address` is bound to
    pub async fn load_binding(&mut self, address: &Pubkey) -> Option<Pubkey> {
        let binding = self.client.address_binding(address);
        self.load_record::<Option<Pubkey>>(binding).await.flatten()
    }

    pub async fn clock(&mut self) -> Clock {
        self.context.banks_client.get_sysvar::<Clock>().await.unwrap()
    }

    /// Keypair with SOL and a governance-token account holding `tokens`
    pub async fn funded_user(&mut self, tokens: u64) -> Result<(Keypair, Pubkey), BanksClientError> {
        let user = Keypair::new();
        let blockhash = self.context.get_new_latest_blockhash().await?;
        fund_lamports(&mut self.context.banks_client, &self.context.payer, blockhash, &user.pubkey(), CALLER_LAMPORTS)
            .await?;
        let token_account = self.token_account_with(&user.pubkey(), tokens).await?;
        Ok((user, token_account))
    }

    /// Creates the associated token account of `owner` and mints `tokens` into it
    pub async fn token_account_with(&mut self, owner: &Pubkey, tokens: u64) -> Result<Pubkey, BanksClientError> {
        let blockhash = self.context.get_new_latest_blockhash().await?;
        let token_account = create_associated_account(
            &mut self.context.banks_client,
            &self.context.payer,
            blockhash,
            owner,
            &self.mint.pubkey(),
        )
        .await?;
        if tokens > 0 {
            mint_tokens(
                &mut self.context.banks_client,
                &self.context.payer,
                blockhash,
                &self.mint.pubkey(),
                &token_account,
                tokens,
            )
            .await?;
        }
        Ok(token_account)
    }

    /// Writes a name record binding a fresh identity to `owner`
    pub fn set_name_record(&mut self, owner: &Pubkey) -> ([u8; 32], Pubkey) {
        let identity = Pubkey::new_unique().to_bytes();
        let address = Pubkey::new_unique();
        let record = NameRecord { identity, owner: *owner };
        self.set_owned_account(&address, record.try_to_vec().unwrap(), self.name_service_program);
        (identity, address)
    }

    /// Writes a price feed with a constant price over the last TWAP period
    pub async fn set_flat_price_feed(&mut self, token: Pubkey, fee_tier: u32, price: u128) -> Pubkey {
        let now = self.clock().await.unix_timestamp;
        let feed = PriceFeedAccount {
            token,
            fee_tier,
            observations: vec![
                PriceObservation {
                    timestamp: now - TEST_TWAP_PERIOD as i64,
                    cumulative_price: 0,
                },
                PriceObservation {
                    timestamp: now,
                    cumulative_price: price * TEST_TWAP_PERIOD as u128,
                },
            ],
        };
        let address = Pubkey::new_unique();
        self.set_owned_account(&address, feed.try_to_vec().unwrap(), self.price_feed_program);
        address
    }

    /// Registers a new relayer staking `stake`; returns the relayer keypair
    pub async fn register_relayer(&mut self, stake: u64, subaddresses: Vec<Pubkey>) -> Result<Keypair, BanksClientError> {
        let (relayer, _) = self.funded_user(stake).await?;
        let (identity, name_record) = self.set_name_record(&relayer.pubkey());
        let registration = Registration {
            identity,
            stake,
            subaddresses,
            fee_rate_bps: None,
        };
        let ix = self.client.register(&relayer.pubkey(), registration, &name_record).unwrap();
        self.process(&[ix], &[&relayer]).await?;
        Ok(relayer)
    }

    fn set_owned_account(&mut self, address: &Pubkey, data: Vec<u8>, owner: Pubkey) {
        let account = Account {
            lamports: CALLER_LAMPORTS,
            data,
            owner,
            executable: false,
            rent_epoch: 0,
        };
        self.context.set_account(address, &AccountSharedData::from(account));
    }
}

/// Decode the registry error carried by a failed transaction
pub fn registry_error(err: BanksClientError) -> Option<RegistryError> {
    let transaction_error = match err {
        BanksClientError::TransactionError(err) => err,
        BanksClientError::SimulationError { err, .. } => err,
        _ => return None,
    };
    match transaction_error {
        TransactionError::InstructionError(_, InstructionError::Custom(code)) => RegistryError::from_code(code),
        _ => None,
    }
}
