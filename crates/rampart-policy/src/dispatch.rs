// dispatch.rs — The per-request harvest state machine.
//
// For one environment, walk the compiled policies in order:
//
// 1. Evaluate the policy's probes. All must pass for the policy's
//    producers to run. A probe answering "no" skips the policy and the
//    harvest continues; a probe *erroring* fails the whole request.
// 2. Run the passing policy's producers in declared order, appending
//    their tasks and products to the aggregate.
// 3. First producer error anywhere ends the harvest: the caller gets the
//    error, never output accumulated before the failure.
//
// The dispatcher owns no state and takes no locks; the compiled policies
// are shared read-only across every concurrently running harvest.

use rampart_api::{Environment, Response};

use crate::compiler::Policy;
use crate::error::PolicyError;

/// Run one environment through the compiled policies and aggregate the
/// output. No retries: every failure is immediate and terminal for this
/// request only.
pub fn harvest(policies: &[Policy], env: &Environment) -> Result<Response, PolicyError> {
    let mut response = Response::default();
    'policies: for policy in policies {
        for probe in &policy.verify {
            if !probe.verify(env)? {
                tracing::debug!(policy = %policy.name, "verification did not pass, skipping policy");
                continue 'policies;
            }
        }

        for producer in &policy.produce {
            let emitted = producer.produce(env)?;
            response.tasks.extend(emitted.tasks);
            response.products.extend(emitted.products);
        }
    }
    Ok(response)
}
