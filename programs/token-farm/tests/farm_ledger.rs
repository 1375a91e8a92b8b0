//! Drives the farm state machine through the same state methods the
//! instruction handlers use, with an in-memory token ledger standing in for
//! the stake vault and the reward mint. Every operation is all-or-nothing like
//! a Solana transaction. The stake mint may withhold a transfer fee on the way
//! into the vault, as a Token-2022 mint with a transfer fee config does.

use anchor_lang::prelude::*;
use proptest::prelude::*;
use rand::{rngs::StdRng, Rng, SeedableRng};
use std::collections::HashMap;
use token_farm::error::ErrorCode;
use token_farm::states::{Farm, FarmConfig, StakerInfo, StakerRegistry};

const RATE: u64 = 1_000_000;
const GENESIS: u64 = 1_000;
const MAX_FEE_BASIS_POINTS: u64 = 10_000;

#[derive(Clone)]
struct Ledger {
    height: u64,
    farm_key: Pubkey,
    farm: Farm,
    registry: StakerRegistry,
    stakers: HashMap<Pubkey, StakerInfo>,
    stake_tokens: HashMap<Pubkey, u64>,
    reward_tokens: HashMap<Pubkey, u64>,
    vault: u64,
    farm_is_mint_authority: bool,
    transfer_fee_basis_points: u64,
}

impl Ledger {
    fn new(reward_per_height: u64) -> Self {
        let farm_key = Pubkey::new_unique();
        let mut farm = Farm::default();
        farm.activate(
            FarmConfig {
                bump: 255,
                creator: Pubkey::new_unique(),
                seed: 0,
                operator: Pubkey::new_unique(),
                stake_mint: Pubkey::new_unique(),
                reward_mint: Pubkey::new_unique(),
                stake_vault: Pubkey::new_unique(),
                staker_registry: Pubkey::new_unique(),
                reward_per_height,
            },
            GENESIS,
        )
        .unwrap();
        Ledger {
            height: GENESIS,
            farm_key,
            farm,
            registry: StakerRegistry {
                bump: 255,
                farm: farm_key,
                stakers: Vec::new(),
            },
            stakers: HashMap::new(),
            stake_tokens: HashMap::new(),
            reward_tokens: HashMap::new(),
            vault: 0,
            farm_is_mint_authority: true,
            transfer_fee_basis_points: 0,
        }
    }

    fn advance(&mut self, slots: u64) {
        self.height += slots;
    }

    fn mint_stake(&mut self, owner: Pubkey, amount: u64) {
        *self.stake_tokens.entry(owner).or_default() += amount;
    }

    /// Fee withheld from an inbound transfer, rounded up.
    fn transfer_fee(&self, amount: u64) -> u64 {
        let fee = (amount as u128 * self.transfer_fee_basis_points as u128)
            .div_ceil(MAX_FEE_BASIS_POINTS as u128);
        fee as u64
    }

    /// The record the handler would see: existing, or freshly allocated.
    fn record(&self, owner: Pubkey) -> StakerInfo {
        self.stakers
            .get(&owner)
            .cloned()
            .unwrap_or_else(|| StakerInfo::new(self.farm_key, owner, 255))
    }

    fn staker(&self, owner: &Pubkey) -> &StakerInfo {
        &self.stakers[owner]
    }

    fn stake_balance(&self, owner: &Pubkey) -> u64 {
        self.stake_tokens.get(owner).copied().unwrap_or(0)
    }

    fn reward_balance(&self, owner: &Pubkey) -> u64 {
        self.reward_tokens.get(owner).copied().unwrap_or(0)
    }

    /// Runs `op` and rolls every change back if it fails.
    fn atomically<T>(&mut self, op: impl FnOnce(&mut Ledger) -> Result<T>) -> Result<T> {
        let snapshot = self.clone();
        let result = op(self);
        if result.is_err() {
            *self = snapshot;
        }
        result
    }

    fn deposit(&mut self, owner: Pubkey, amount: u64) -> Result<()> {
        self.atomically(|ledger| {
            if amount == 0 {
                return Err(error!(ErrorCode::InvalidAmount));
            }
            if ledger.stake_balance(&owner) < amount {
                return Err(error!(ErrorCode::TransferFailed));
            }
            let mut info = ledger.record(owner);
            *ledger.stake_tokens.entry(owner).or_default() -= amount;
            let vault_before = ledger.vault;
            ledger.vault += amount - ledger.transfer_fee(amount);
            let received = ledger.vault - vault_before;

            let height = ledger.height;
            ledger
                .farm
                .record_deposit(&mut ledger.registry, &mut info, received, height)?;
            ledger.stakers.insert(owner, info);
            Ok(())
        })
    }

    fn withdraw(&mut self, owner: Pubkey) -> Result<u64> {
        self.atomically(|ledger| {
            let mut info = ledger.record(owner);
            let height = ledger.height;
            let amount = ledger.farm.record_withdrawal(&mut info, height)?;
            ledger.vault -= amount;
            *ledger.stake_tokens.entry(owner).or_default() += amount;
            ledger.stakers.insert(owner, info);
            Ok(amount)
        })
    }

    fn claim(&mut self, owner: Pubkey) -> Result<u64> {
        self.atomically(|ledger| {
            let mut info = ledger.record(owner);
            let height = ledger.height;
            let amount = ledger.farm.record_claim(&mut info, height)?;
            if amount > 0 {
                if !ledger.farm_is_mint_authority {
                    return Err(error!(ErrorCode::MintFailed));
                }
                *ledger.reward_tokens.entry(owner).or_default() += amount;
            }
            ledger.stakers.insert(owner, info);
            Ok(amount)
        })
    }

    fn distribute(&mut self) -> Result<u32> {
        self.atomically(|ledger| {
            let mut records: Vec<StakerInfo> = ledger
                .registry
                .stakers
                .iter()
                .map(|owner| ledger.stakers[owner].clone())
                .collect();
            let height = ledger.height;
            let settled = {
                let mut refs: Vec<&mut StakerInfo> = records.iter_mut().collect();
                ledger.farm.distribute(&ledger.registry, &mut refs, height)?
            };
            for record in records {
                ledger.stakers.insert(record.owner, record);
            }
            Ok(settled)
        })
    }

    fn check_invariants(&self) {
        let sum: u64 = self.stakers.values().map(|s| s.balance).sum();
        assert_eq!(self.farm.total_staking_balance, sum);
        assert_eq!(self.vault, sum);
        for info in self.stakers.values() {
            assert_eq!(info.is_staking, info.balance > 0);
            assert!(info.has_staked || info.balance == 0);
            assert!(info.checkpoint <= self.height);
        }
        let mut seen = std::collections::HashSet::new();
        for owner in &self.registry.stakers {
            assert!(seen.insert(*owner), "{} registered twice", owner);
            assert!(self.stakers[owner].has_staked);
        }
        let registered = self.stakers.values().filter(|s| s.has_staked).count();
        assert_eq!(seen.len(), registered);
    }
}

fn error_number<T: std::fmt::Debug>(result: Result<T>) -> u32 {
    match result {
        Err(anchor_lang::error::Error::AnchorError(e)) => e.error_code_number,
        other => panic!("expected an anchor error, got {:?}", other),
    }
}

#[test]
fn deposit_escrows_stake_and_registers_staker() {
    let mut ledger = Ledger::new(RATE);
    let user = Pubkey::new_unique();
    ledger.mint_stake(user, 100);

    ledger.deposit(user, 50).unwrap();

    let info = ledger.staker(&user);
    assert_eq!(info.balance, 50);
    assert!(info.is_staking);
    assert!(info.has_staked);
    assert_eq!(info.registry_index, 0);
    assert_eq!(ledger.farm.total_staking_balance, 50);
    assert_eq!(ledger.stake_balance(&user), 50);
    assert_eq!(ledger.vault, 50);
    assert_eq!(ledger.registry.stakers, vec![user]);
    ledger.check_invariants();
}

#[test]
fn sole_staker_claims_full_emission() {
    let mut ledger = Ledger::new(RATE);
    let user = Pubkey::new_unique();
    ledger.mint_stake(user, 50);
    ledger.deposit(user, 50).unwrap();

    ledger.advance(2);
    let before = ledger.reward_balance(&user);
    let claimed = ledger.claim(user).unwrap();

    assert_eq!(claimed, RATE * 2);
    assert_eq!(ledger.reward_balance(&user) - before, RATE * 2);
    assert_eq!(ledger.staker(&user).pending, 0);
    assert_eq!(ledger.staker(&user).total_claimed, RATE * 2);
    assert_eq!(ledger.farm.total_rewards_claimed, RATE * 2);
}

#[test]
fn distribution_favours_the_earlier_staker() {
    let mut ledger = Ledger::new(RATE);
    let a = Pubkey::new_unique();
    let b = Pubkey::new_unique();
    ledger.mint_stake(a, 100);
    ledger.mint_stake(b, 100);

    ledger.deposit(a, 100).unwrap();
    ledger.advance(3);
    ledger.deposit(b, 100).unwrap();
    ledger.advance(1);

    assert_eq!(ledger.distribute().unwrap(), 2);

    let height = ledger.height;
    let (a_info, b_info) = (ledger.staker(&a), ledger.staker(&b));
    // A is settled over all 4 slots at the current half share.
    assert_eq!(a_info.pending, RATE * 4 / 2);
    assert_eq!(b_info.pending, RATE / 2);
    assert!(a_info.pending > b_info.pending);
    assert_eq!(a_info.checkpoint, height);
    assert_eq!(b_info.checkpoint, height);
    assert_eq!(ledger.farm.last_distribution_height, height);
    // Bookkeeping only.
    assert_eq!(ledger.reward_balance(&a), 0);
    assert_eq!(ledger.reward_balance(&b), 0);
}

#[test]
fn withdraw_keeps_pending_claimable() {
    let mut ledger = Ledger::new(RATE);
    let user = Pubkey::new_unique();
    ledger.mint_stake(user, 30);
    ledger.deposit(user, 30).unwrap();
    ledger.advance(1);

    assert_eq!(ledger.withdraw(user).unwrap(), 30);

    let info = ledger.staker(&user).clone();
    assert_eq!(info.balance, 0);
    assert!(!info.is_staking);
    assert!(info.pending > 0);
    assert_eq!(ledger.stake_balance(&user), 30);
    assert_eq!(ledger.vault, 0);

    ledger.advance(5);
    let claimed = ledger.claim(user).unwrap();
    assert_eq!(claimed, info.pending);
    assert_eq!(ledger.reward_balance(&user), info.pending);
    assert_eq!(ledger.staker(&user).pending, 0);
}

#[test]
fn second_withdraw_fails_with_nothing_staked() {
    let mut ledger = Ledger::new(RATE);
    let user = Pubkey::new_unique();
    ledger.mint_stake(user, 10);
    ledger.deposit(user, 10).unwrap();
    ledger.withdraw(user).unwrap();

    assert_eq!(
        error_number(ledger.withdraw(user)),
        u32::from(ErrorCode::NothingStaked)
    );
}

#[test]
fn failed_mint_keeps_pending() {
    let mut ledger = Ledger::new(RATE);
    let user = Pubkey::new_unique();
    ledger.mint_stake(user, 10);
    ledger.deposit(user, 10).unwrap();
    ledger.advance(3);
    ledger.farm_is_mint_authority = false;

    let before = ledger.staker(&user).clone();
    assert_eq!(
        error_number(ledger.claim(user)),
        u32::from(ErrorCode::MintFailed)
    );
    let after = ledger.staker(&user);
    assert_eq!(after.pending, before.pending);
    assert_eq!(after.checkpoint, before.checkpoint);
    assert_eq!(ledger.reward_balance(&user), 0);

    ledger.farm_is_mint_authority = true;
    assert_eq!(ledger.claim(user).unwrap(), RATE * 3);
}

#[test]
fn zero_claim_succeeds_without_mint_rights() {
    let mut ledger = Ledger::new(RATE);
    let user = Pubkey::new_unique();
    ledger.mint_stake(user, 10);
    ledger.deposit(user, 10).unwrap();
    ledger.farm_is_mint_authority = false;

    assert_eq!(ledger.claim(user).unwrap(), 0);
}

#[test]
fn failed_transfer_leaves_no_trace() {
    let mut ledger = Ledger::new(RATE);
    let user = Pubkey::new_unique();
    ledger.mint_stake(user, 10);

    assert_eq!(
        error_number(ledger.deposit(user, 11)),
        u32::from(ErrorCode::TransferFailed)
    );
    assert_eq!(
        error_number(ledger.deposit(user, 0)),
        u32::from(ErrorCode::InvalidAmount)
    );
    assert!(ledger.registry.is_empty());
    assert!(ledger.stakers.is_empty());
    assert_eq!(ledger.stake_balance(&user), 10);
    assert_eq!(ledger.farm.total_staking_balance, 0);
}

#[test]
fn registry_appends_each_staker_once() {
    let mut ledger = Ledger::new(RATE);
    let a = Pubkey::new_unique();
    let b = Pubkey::new_unique();
    ledger.mint_stake(a, 1_000);
    ledger.mint_stake(b, 1_000);

    for _ in 0..3 {
        ledger.deposit(a, 10).unwrap();
        ledger.deposit(b, 10).unwrap();
        ledger.advance(1);
        ledger.deposit(a, 5).unwrap();
        ledger.withdraw(a).unwrap();
        ledger.withdraw(b).unwrap();
    }

    assert_eq!(ledger.registry.stakers, vec![a, b]);
    assert_eq!(ledger.staker(&b).registry_index, 1);
    ledger.check_invariants();
}

#[test]
fn distribution_skips_stakers_that_left() {
    let mut ledger = Ledger::new(RATE);
    let a = Pubkey::new_unique();
    let b = Pubkey::new_unique();
    ledger.mint_stake(a, 100);
    ledger.mint_stake(b, 100);
    ledger.deposit(a, 100).unwrap();
    ledger.deposit(b, 100).unwrap();
    ledger.advance(2);
    ledger.withdraw(b).unwrap();
    let b_before = ledger.staker(&b).clone();
    ledger.advance(2);

    assert_eq!(ledger.distribute().unwrap(), 1);

    let b_after = ledger.staker(&b);
    assert_eq!(b_after.pending, b_before.pending);
    assert_eq!(b_after.checkpoint, b_before.checkpoint);
    assert_eq!(ledger.registry.len(), 2);
}

#[test]
fn distribute_twice_in_one_slot_is_idempotent() {
    let mut ledger = Ledger::new(RATE);
    let a = Pubkey::new_unique();
    ledger.mint_stake(a, 100);
    ledger.deposit(a, 100).unwrap();
    ledger.advance(7);

    ledger.distribute().unwrap();
    let pending = ledger.staker(&a).pending;
    ledger.distribute().unwrap();
    assert_eq!(ledger.staker(&a).pending, pending);
}

#[test]
fn equal_stakes_earn_in_order_of_entry() {
    let mut rng = StdRng::seed_from_u64(0x5eed);
    let mut ledger = Ledger::new(RATE);
    let stakers: Vec<Pubkey> = (0..32).map(|_| Pubkey::new_unique()).collect();

    for owner in &stakers {
        ledger.mint_stake(*owner, 100);
        ledger.deposit(*owner, 100).unwrap();
        ledger.advance(rng.random_range(1..=20u64));
    }
    ledger.distribute().unwrap();

    for pair in stakers.windows(2) {
        assert!(ledger.staker(&pair[0]).pending > ledger.staker(&pair[1]).pending);
    }
    ledger.check_invariants();
}

#[test]
fn claim_without_a_record_yields_nothing() {
    let mut ledger = Ledger::new(RATE);
    let stranger = Pubkey::new_unique();
    ledger.advance(10);

    assert_eq!(ledger.claim(stranger).unwrap(), 0);

    let info = ledger.staker(&stranger);
    assert_eq!(info.pending, 0);
    assert!(!info.has_staked);
    assert!(ledger.registry.is_empty());
    assert_eq!(ledger.reward_balance(&stranger), 0);
    ledger.check_invariants();

    // A later deposit still registers the wallet exactly once.
    ledger.mint_stake(stranger, 5);
    ledger.deposit(stranger, 5).unwrap();
    assert_eq!(ledger.registry.stakers, vec![stranger]);
    assert_eq!(ledger.staker(&stranger).registry_index, 0);
    ledger.check_invariants();
}

#[test]
fn withdraw_without_a_record_fails_with_nothing_staked() {
    let mut ledger = Ledger::new(RATE);
    let stranger = Pubkey::new_unique();

    assert_eq!(
        error_number(ledger.withdraw(stranger)),
        u32::from(ErrorCode::NothingStaked)
    );
    assert!(ledger.stakers.is_empty());
    assert!(ledger.registry.is_empty());
}

#[test]
fn huge_rate_still_returns_principal() {
    let mut ledger = Ledger::new(1_000_000_000_000_000_000);
    let user = Pubkey::new_unique();
    ledger.mint_stake(user, 50);
    ledger.deposit(user, 50).unwrap();
    ledger.advance(20);

    assert_eq!(ledger.withdraw(user).unwrap(), 50);
    assert_eq!(ledger.stake_balance(&user), 50);
    assert_eq!(ledger.vault, 0);
    assert_eq!(ledger.staker(&user).pending, u64::MAX);

    assert_eq!(ledger.claim(user).unwrap(), u64::MAX);
    assert_eq!(ledger.reward_balance(&user), u64::MAX);
    ledger.check_invariants();
}

#[test]
fn transfer_fee_credits_only_what_the_vault_received() {
    let mut ledger = Ledger::new(RATE);
    ledger.transfer_fee_basis_points = 100;
    let user = Pubkey::new_unique();
    ledger.mint_stake(user, 1_000);

    ledger.deposit(user, 1_000).unwrap();

    assert_eq!(ledger.stake_balance(&user), 0);
    assert_eq!(ledger.vault, 990);
    assert_eq!(ledger.staker(&user).balance, 990);
    assert_eq!(ledger.farm.total_staking_balance, 990);
    ledger.check_invariants();

    assert_eq!(ledger.withdraw(user).unwrap(), 990);
    assert_eq!(ledger.vault, 0);
    ledger.check_invariants();
}

#[test]
fn deposit_swallowed_by_fee_is_rejected() {
    let mut ledger = Ledger::new(RATE);
    ledger.transfer_fee_basis_points = 100;
    let user = Pubkey::new_unique();
    ledger.mint_stake(user, 1);

    assert_eq!(
        error_number(ledger.deposit(user, 1)),
        u32::from(ErrorCode::InvalidAmount)
    );
    assert_eq!(ledger.stake_balance(&user), 1);
    assert_eq!(ledger.vault, 0);
    assert!(ledger.registry.is_empty());
}

#[derive(Clone, Debug)]
enum Op {
    Deposit(usize, u64),
    Withdraw(usize),
    Claim(usize),
    Distribute,
    Advance(u64),
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        (0usize..4, 0u64..500).prop_map(|(who, amount)| Op::Deposit(who, amount)),
        (0usize..4).prop_map(Op::Withdraw),
        (0usize..4).prop_map(Op::Claim),
        Just(Op::Distribute),
        (0u64..50).prop_map(Op::Advance),
    ]
}

proptest! {
    #[test]
    fn bookkeeping_invariants_hold(
        ops in proptest::collection::vec(op_strategy(), 1..60),
        fee_basis_points in prop_oneof![Just(0u64), 1u64..500],
    ) {
        let mut ledger = Ledger::new(RATE);
        ledger.transfer_fee_basis_points = fee_basis_points;
        let owners: Vec<Pubkey> = (0..4).map(|_| Pubkey::new_unique()).collect();
        for owner in &owners {
            ledger.mint_stake(*owner, 2_000);
        }

        for op in ops {
            let before: HashMap<Pubkey, StakerInfo> = ledger.stakers.clone();
            let claimed = match op {
                Op::Deposit(who, amount) => { let _ = ledger.deposit(owners[who], amount); None }
                Op::Withdraw(who) => { let _ = ledger.withdraw(owners[who]); None }
                Op::Claim(who) => ledger.claim(owners[who]).ok().map(|_| owners[who]),
                Op::Distribute => { let _ = ledger.distribute(); None }
                Op::Advance(slots) => { ledger.advance(slots); None }
            };
            ledger.check_invariants();

            for (owner, old) in &before {
                let new = ledger.staker(owner);
                prop_assert!(new.checkpoint >= old.checkpoint);
                if claimed == Some(*owner) {
                    prop_assert_eq!(new.pending, 0);
                } else {
                    prop_assert!(new.pending >= old.pending);
                }
            }
        }

        let minted: u64 = owners.iter().map(|o| ledger.reward_balance(o)).sum();
        prop_assert_eq!(minted, ledger.farm.total_rewards_claimed);
    }
}
