//! Property tests across the codec, lifecycle and permission layers.

use std::sync::OnceLock;

use chrono::Duration;
use proptest::prelude::*;

use hilo_core::{authorize, check_expiry_at, Claims, NumericDate, TokenState};
use hilo_crypto::{SigningKeyPair, TokenCodec};

fn codec() -> &'static TokenCodec {
    static CODEC: OnceLock<TokenCodec> = OnceLock::new();
    CODEC.get_or_init(|| TokenCodec::new(SigningKeyPair::generate().unwrap()))
}

fn path_segment() -> impl Strategy<Value = String> {
    "[a-z0-9_-]{1,8}"
}

fn path() -> impl Strategy<Value = String> {
    prop::collection::vec(path_segment(), 0..4).prop_map(|segs| format!("/{}", segs.join("/")))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn verified_claims_match_signed_claims(
        user_id in "[a-zA-Z0-9-]{1,16}",
        permissions in prop::collection::vec(path(), 0..5),
        exp in -10_000i64..10_000_000_000,
    ) {
        let claims = Claims::builder()
            .user_id(user_id)
            .permissions(permissions)
            .expires_at(NumericDate::from_seconds(exp).to_datetime().unwrap())
            .build();
        let token = codec().sign(&claims).unwrap();
        prop_assert_eq!(codec().verify(token.as_str()).unwrap(), claims);
    }

    #[test]
    fn authorize_agrees_with_prefix_test(
        permissions in prop::collection::vec(path(), 0..5),
        request in path(),
    ) {
        let expected = permissions.iter().any(|p| request.starts_with(p.as_str()));
        let claims = Claims::builder().permissions(permissions).build();
        prop_assert_eq!(authorize(&claims, &request), expected);
    }

    #[test]
    fn refreshed_expired_token_is_valid_for_renewal(
        age in 1i64..1_000_000,
        renewal in 1i64..1_000_000,
    ) {
        let now = NumericDate::now();
        let claims = Claims::builder()
            .subject("svc")
            .expires_at(now.offset(Duration::seconds(-age)).to_datetime().unwrap())
            .build();
        let token = codec().sign(&claims).unwrap();

        let refreshed = codec()
            .refresh_at(token.as_str(), Duration::seconds(renewal), now)
            .unwrap();
        let renewed = codec().verify(refreshed.as_str()).unwrap();
        prop_assert_eq!(renewed.expires_at, Some(now.offset(Duration::seconds(renewal))));
        prop_assert_eq!(check_expiry_at(&renewed, now), TokenState::Valid);
        prop_assert_eq!(renewed.subject.as_deref(), Some("svc"));
    }
}
