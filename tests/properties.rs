use fairshare::models::{
    Expense, Member, MemberId, Money, Receipt, ReceiptItem, Settlement, SplitMethod,
};
use fairshare::services::balance::calculate_group_balances;
use fairshare::services::claims::{
    create_claim, get_item_remaining_fraction, ClaimOptions,
};
use fairshare::services::split::{equal_split, shares_split};
use fairshare::services::totals::calculate_member_totals;
use proptest::prelude::*;

fn cents(amount: f64) -> i64 {
    Money::from_amount(amount).cents()
}

proptest! {
    #[test]
    fn equal_split_conserves_cents(total_cents in 0i64..=10_000_000, member_count in 1usize..=12) {
        let members: Vec<MemberId> = (0..member_count).map(|_| MemberId::new()).collect();
        let total = total_cents as f64 / 100.0;

        let splits = equal_split(total, &members);
        prop_assert_eq!(splits.len(), member_count);

        let sum: i64 = splits.iter().map(|s| cents(s.amount)).sum();
        prop_assert_eq!(sum, total_cents);

        let base = cents(splits[0].amount);
        for split in &splits[..member_count - 1] {
            prop_assert_eq!(cents(split.amount), base);
        }
    }

    #[test]
    fn shares_split_stays_near_total(
        total_cents in 1i64..=1_000_000,
        shares in prop::collection::vec(1u32..=10, 1..=8),
    ) {
        let assigned: Vec<(MemberId, f64)> = shares
            .iter()
            .map(|&s| (MemberId::new(), f64::from(s)))
            .collect();
        let total = total_cents as f64 / 100.0;

        let splits = shares_split(total, &assigned);
        let sum: i64 = splits.iter().map(|s| cents(s.amount)).sum();
        prop_assert!((sum - total_cents).abs() <= assigned.len() as i64);
    }

    #[test]
    fn balances_sum_to_zero(
        member_count in 2usize..=6,
        expenses in prop::collection::vec((1i64..=50_000, 0usize..=5), 0..=20),
        settlements in prop::collection::vec((1i64..=10_000, 0usize..=5, 0usize..=5), 0..=10),
    ) {
        let members: Vec<Member> = (0..member_count)
            .map(|i| Member::new(format!("Member {}", i)))
            .collect();
        let ids: Vec<MemberId> = members.iter().map(|m| m.id).collect();

        let expenses: Vec<Expense> = expenses
            .into_iter()
            .map(|(amount_cents, payer)| {
                let amount = amount_cents as f64 / 100.0;
                Expense::new(
                    "Shared",
                    amount,
                    ids[payer % member_count],
                    SplitMethod::Equal,
                    equal_split(amount, &ids),
                )
            })
            .collect();
        let settlements: Vec<Settlement> = settlements
            .into_iter()
            .map(|(amount_cents, from, to)| {
                Settlement::new(
                    ids[from % member_count],
                    ids[to % member_count],
                    amount_cents as f64 / 100.0,
                )
            })
            .collect();

        let balances = calculate_group_balances(&expenses, &settlements, &members);
        prop_assert_eq!(balances.len(), member_count);

        let net: i64 = balances.iter().map(|b| cents(b.net)).sum();
        prop_assert!(net.abs() <= member_count as i64, "net drift {} cents", net);
    }

    #[test]
    fn remaining_fraction_never_grows_or_goes_negative(
        fractions in prop::collection::vec(0.01f64..=1.0, 1..=6),
    ) {
        let receipt = Receipt::new("Cafe");
        let mut item = ReceiptItem::new(receipt.id, "Platter", 42.0);
        let mut previous = get_item_remaining_fraction(&item);
        prop_assert_eq!(previous, 1.0);

        for fraction in fractions {
            let claim = create_claim(item.id, MemberId::new(), &ClaimOptions::fraction(fraction));
            item.claims.push(claim);

            let remaining = get_item_remaining_fraction(&item);
            prop_assert!(remaining >= 0.0);
            prop_assert!(remaining <= previous);
            previous = remaining;
        }
    }

    #[test]
    fn fully_claimed_receipt_totals_cover_the_bill(
        prices in prop::collection::vec(1i64..=20_000, 1..=6),
        tax_cents in 0i64..=5_000,
        tip_cents in 0i64..=5_000,
        owners in prop::collection::vec(0usize..=2, 6),
    ) {
        let members = vec![Member::new("Ana"), Member::new("Ben"), Member::new("Cy")];
        let receipt = Receipt::new("Diner").with_amounts(
            None,
            Some(tax_cents as f64 / 100.0),
            Some(tip_cents as f64 / 100.0),
            None,
        );

        let items: Vec<ReceiptItem> = prices
            .iter()
            .map(|&p| ReceiptItem::new(receipt.id, "Dish", p as f64 / 100.0))
            .collect();
        let claims: Vec<_> = items
            .iter()
            .enumerate()
            .map(|(i, item)| create_claim(item.id, members[owners[i]].id, &ClaimOptions::default()))
            .collect();

        let totals = calculate_member_totals(&receipt, &items, &claims, &members);
        let grand: f64 = totals.iter().map(|t| t.grand_total).sum();
        let expected = (prices.iter().sum::<i64>() + tax_cents + tip_cents) as f64 / 100.0;
        prop_assert!((grand - expected).abs() < 0.01, "{} vs {}", grand, expected);
    }
}
