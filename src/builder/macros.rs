//! Macros for ergonomic chain and conjunction construction.

/// Build an [`ActionChain`](crate::core::ActionChain) from a list of actions.
///
/// # Example
///
/// ```
/// use polystate::actions;
/// use polystate::core::log;
///
/// let chain = actions![log("leaving menu"), || println!("bye")];
/// assert_eq!(chain.len(), 2);
/// ```
#[macro_export]
macro_rules! actions {
    ($($action:expr),* $(,)?) => {{
        #[allow(unused_mut)]
        let mut chain = $crate::core::ActionChain::new();
        $(chain.push($action);)*
        chain
    }};
}

/// Build a [`Conditions`](crate::core::Conditions) conjunction from a list
/// of conditions.
///
/// # Example
///
/// ```
/// use polystate::conditions;
/// use polystate::conditions::{Always, OnEvent};
/// use polystate::core::Conditions;
///
/// let all: Conditions<u8, &str> = conditions![Always, OnEvent::new("go")];
/// assert_eq!(all.describe(), "[always, \"go\"]");
/// ```
#[macro_export]
macro_rules! conditions {
    ($($condition:expr),* $(,)?) => {
        $crate::core::Conditions::new()$(.with($condition))*
    };
}
