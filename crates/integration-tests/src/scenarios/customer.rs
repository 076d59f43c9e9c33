//! Customer registration, login and profile management.

use storeprobe_core::CustomerUpdate;
use storeprobe_fixtures::{AddressFixture, CustomerFixture, invalid};

use crate::context::TestContext;
use crate::scenario::{
    Halted, ScenarioReport, ScenarioRunner, StepError, ensure, ensure_eq, expect_rejection,
};

const PLAN: &[&str] = &[
    "register customer",
    "reject duplicate email",
    "reject empty registration",
    "log in",
    "reject wrong password",
    "reject unknown customer",
    "read profile",
    "update profile",
    "reject anonymous profile read",
    "add address",
];

const WRONG_PASSWORD: &str = "wrong_password";
const UNKNOWN_EMAIL: &str = "nonexistent@example.com";

/// Register a customer and walk through login and profile edits.
pub async fn customer_lifecycle(ctx: &TestContext) -> ScenarioReport {
    let mut runner = ctx.runner("customer_lifecycle", PLAN);
    let _ = run(ctx, &mut runner).await;
    runner.finish()
}

async fn run(ctx: &TestContext, runner: &mut ScenarioRunner) -> Result<(), Halted> {
    let client = &ctx.client;

    let (registration, registered) = runner
        .step("register customer", async {
            let registration = CustomerFixture::new().with_address().build_random()?;
            let customer = client.register_customer(&registration).await?;
            ensure(
                customer.email.matches(registration.customer.email.as_str()),
                || format!("registered as {}", customer.email),
            )?;
            ensure_eq(
                "firstname",
                customer.firstname.as_str(),
                registration.customer.firstname.as_str(),
            )?;
            ensure_eq(
                "lastname",
                customer.lastname.as_str(),
                registration.customer.lastname.as_str(),
            )?;
            Ok::<_, StepError>((registration, customer))
        })
        .await?;
    let email = registration.customer.email.as_str();

    runner
        .step("reject duplicate email", async {
            let err = expect_rejection(
                "duplicate email",
                client.register_customer(&registration).await,
                &[400],
            )?;
            ensure(err.message_contains("already exists"), || {
                format!("unexpected message: {}", err.message())
            })
        })
        .await?;

    runner
        .step("reject empty registration", async {
            let payload = invalid::customer_registration();
            expect_rejection(
                "empty registration",
                client.register_customer_raw(&payload).await,
                &[400],
            )?;
            Ok::<_, StepError>(())
        })
        .await?;

    let customer_client = runner
        .step("log in", async {
            let logged_in = client.customer_login(email, &registration.password).await?;
            ensure(
                logged_in
                    .credential()
                    .is_some_and(|credential| !credential.token().is_empty()),
                || "login returned an empty token".into(),
            )?;
            Ok::<_, StepError>(logged_in)
        })
        .await?;

    runner
        .step("reject wrong password", async {
            expect_rejection(
                "wrong password",
                client.customer_token(email, WRONG_PASSWORD).await,
                &[401],
            )?;
            Ok::<_, StepError>(())
        })
        .await?;

    runner
        .step("reject unknown customer", async {
            expect_rejection(
                "unknown customer",
                client
                    .customer_token(UNKNOWN_EMAIL, &registration.password)
                    .await,
                &[401],
            )?;
            Ok::<_, StepError>(())
        })
        .await?;

    let profile = runner
        .step("read profile", async {
            let profile = customer_client.current_customer().await?;
            ensure_eq("customer id", profile.id, registered.id)?;
            ensure(profile.email.matches(email), || {
                format!("profile email {} does not match {email}", profile.email)
            })?;
            Ok::<_, StepError>(profile)
        })
        .await?;

    let profile = runner
        .step("update profile", async {
            let update = CustomerUpdate::from_customer(&profile).name("Updated", &profile.lastname);
            let updated = customer_client.update_current_customer(&update).await?;
            ensure_eq("firstname", updated.firstname.as_str(), "Updated")?;
            ensure_eq("lastname", updated.lastname.as_str(), profile.lastname.as_str())?;
            Ok::<_, StepError>(updated)
        })
        .await?;

    runner
        .step("reject anonymous profile read", async {
            expect_rejection(
                "profile read without a token",
                client.current_customer().await,
                &[401],
            )?;
            Ok::<_, StepError>(())
        })
        .await?;

    runner
        .step("add address", async {
            let extra = AddressFixture::new()
                .name(&profile.firstname, &profile.lastname)
                .secondary()
                .build_random();
            let mut addresses = profile.addresses.clone();
            addresses.push(extra);
            let update = CustomerUpdate::from_customer(&profile).addresses(addresses);
            let updated = customer_client.update_current_customer(&update).await?;
            ensure(updated.addresses.len() >= 2, || {
                format!("expected at least 2 addresses, got {}", updated.addresses.len())
            })
        })
        .await?;

    Ok(())
}
