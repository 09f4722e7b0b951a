//! Cart commands.

use anyhow::Result;
use rocket_cart::{Cart, CartOutcome, UpdateProductAmount};
use serde::Serialize;

use super::{AddArgs, OutcomeFailed, RemoveArgs, UpdateArgs};
use crate::context::Context;
use crate::output::{format_price, outcome_badge, Output};

/// Result of a cart operation, as printed with `--json`.
#[derive(Serialize)]
struct OperationReport<'a> {
    outcome: CartOutcome,
    cart: &'a Cart,
}

/// Print the current cart.
pub async fn show(ctx: &Context) -> Result<()> {
    let store = ctx.cart_store()?;
    print_cart(&ctx.output, store.cart());
    Ok(())
}

/// Add one unit of a product.
pub async fn add(args: AddArgs, ctx: &Context) -> Result<()> {
    let mut store = ctx.cart_store()?;

    let pb = ctx.output.spinner("Checking stock...");
    let outcome = store.add_product(args.product_id).await;
    pb.finish_and_clear();

    report(ctx, outcome, store.cart())
}

/// Remove a product.
pub async fn remove(args: RemoveArgs, ctx: &Context) -> Result<()> {
    let mut store = ctx.cart_store()?;
    let outcome = store.remove_product(args.product_id);

    if outcome == CartOutcome::Removed {
        ctx.output.success(&format!("Removed product {}", args.product_id));
    }
    report(ctx, outcome, store.cart())
}

/// Set a product's quantity.
pub async fn update(args: UpdateArgs, ctx: &Context) -> Result<()> {
    let mut store = ctx.cart_store()?;

    let pb = ctx.output.spinner("Checking stock...");
    let outcome = store
        .update_product_amount(UpdateProductAmount::new(args.product_id, args.amount))
        .await;
    pb.finish_and_clear();

    if outcome == CartOutcome::Ignored {
        ctx.output.debug(&format!(
            "Amount {} is below 1; cart left unchanged",
            args.amount
        ));
    }
    report(ctx, outcome, store.cart())
}

fn report(ctx: &Context, outcome: CartOutcome, cart: &Cart) -> Result<()> {
    if ctx.output.is_json() {
        ctx.output.json(&OperationReport { outcome, cart });
    } else {
        ctx.output.debug(&format!("Outcome: {}", outcome_badge(outcome)));
        if outcome.is_mutation() {
            print_cart(&ctx.output, cart);
        }
    }

    if outcome.is_failure() {
        return Err(OutcomeFailed(outcome).into());
    }
    Ok(())
}

fn print_cart(output: &Output, cart: &Cart) {
    if output.is_json() {
        output.json(cart);
        return;
    }

    output.header("Cart");
    if cart.is_empty() {
        output.info("Cart is empty");
        return;
    }

    let widths = [6, 32, 8, 14, 14];
    output.table_row(&["ID", "PRODUCT", "AMOUNT", "PRICE", "SUBTOTAL"], &widths);

    let mut total = 0.0;
    for item in cart {
        let subtotal = item.price * item.amount as f64;
        total += subtotal;
        let cols = [
            item.id.to_string(),
            item.name.clone(),
            item.amount.to_string(),
            format_price(item.price),
            format_price(subtotal),
        ];
        let cols: Vec<&str> = cols.iter().map(String::as_str).collect();
        output.table_row(&cols, &widths);
    }

    output.kv("Items", &cart.item_count().to_string());
    output.kv("Total", &format_price(total));
}
