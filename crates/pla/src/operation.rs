//! Operation frames
//!
//! A request stub is ORPCTHIS followed by the `[in]` parameters; a response
//! stub is ORPCTHAT, the `[out]` parameters and a trailing HRESULT. The
//! deferral queue is flushed after the header and after every top-level
//! parameter, so each parameter's pointer bodies sit right behind it.

use std::fmt::Debug;

use pla_ndr::{Bytes, DecodeHook, EncodeHook, NdrContext, NdrDecode, NdrEncode};

use crate::error::{Hresult, Result};
use crate::orpc::OrpcThis;

/// Response frames expose their status word
pub trait ResponseStatus {
    /// Status word returned by the server
    fn status(&self) -> Hresult;

    /// Response carrying only a status, every out-parameter left at default
    fn with_status(status: Hresult) -> Self;
}

/// Request frames expose their ORPC header
pub trait OrpcRequest {
    /// ORPCTHIS slot; `None` marshals the default header
    fn orpc_this_mut(&mut self) -> &mut Option<OrpcThis>;
}

/// One method of the interface
pub trait Operation {
    /// Operation number within the interface
    const OPNUM: u16;
    /// Method name for logs
    const NAME: &'static str;

    /// `[in]` frame
    type Request: NdrEncode + NdrDecode + OrpcRequest + Default + Debug + Send + Sync + 'static;
    /// `[out]` frame
    type Response: NdrEncode + NdrDecode + ResponseStatus + Default + Debug + Send + Sync + 'static;
}

/// Marshal a request stub
pub fn marshal_request<O: Operation>(request: &O::Request, ctx: NdrContext) -> Result<Bytes> {
    Ok(pla_ndr::encode(request, ctx)?)
}

/// Marshal a request stub after `hook` has inspected the request
///
/// The hook may refuse the request with [`pla_ndr::NdrError::Rejected`].
pub fn marshal_request_with_hook<O: Operation>(
    request: &O::Request,
    ctx: NdrContext,
    hook: Option<EncodeHook<'_, O::Request>>,
) -> Result<Bytes> {
    Ok(pla_ndr::encode_with_hook(request, ctx, hook)?)
}

/// Unmarshal a request stub
pub fn unmarshal_request<O: Operation>(stub: Bytes, ctx: NdrContext) -> Result<O::Request> {
    Ok(pla_ndr::decode(stub, ctx)?)
}

/// Marshal a response stub
pub fn marshal_response<O: Operation>(response: &O::Response, ctx: NdrContext) -> Result<Bytes> {
    Ok(pla_ndr::encode(response, ctx)?)
}

/// Unmarshal a response stub
///
/// The frame is decoded in full even when the status word is a failure; the
/// caller decides what a failure means.
pub fn unmarshal_response<O: Operation>(stub: Bytes, ctx: NdrContext) -> Result<O::Response> {
    Ok(pla_ndr::decode(stub, ctx)?)
}

/// Unmarshal a response stub into a value `hook` has prepared first
pub fn unmarshal_response_with_hook<O: Operation>(
    stub: Bytes,
    ctx: NdrContext,
    hook: Option<DecodeHook<'_, O::Response>>,
) -> Result<O::Response> {
    Ok(pla_ndr::decode_with_hook(stub, ctx, hook)?)
}

#[doc(hidden)]
#[macro_export]
macro_rules! __pla_encode_param {
    (ptr, $w:ident, $field:expr) => {
        $w.write_pointer($field.as_ref())
    };
    (val, $w:ident, $field:expr) => {
        $crate::__private::NdrEncode::ndr_encode(&$field, $w)?
    };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __pla_decode_param {
    (ptr, $r:ident, $field:expr) => {
        $r.read_pointer(&mut $field)?
    };
    (val, $r:ident, $field:expr) => {
        $crate::__private::NdrDecode::ndr_decode(&mut $field, $r)?
    };
}

/// Define one operation: the marker type, its request and response frames
/// and their wire codecs
///
/// Parameters are declared as `name: Type => kind`, where `ptr` marks a
/// unique pointer held as `Option<T>` and `val` an inline value.
#[macro_export]
macro_rules! pla_operation {
    (
        $(#[$meta:meta])*
        $op:ident = $opnum:expr, $name:literal;
        request $request:ident { $($in_field:ident: $in_ty:ty => $in_kind:ident),* $(,)? }
        response $response:ident { $($out_field:ident: $out_ty:ty => $out_kind:ident),* $(,)? }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy)]
        pub struct $op;

        #[doc = concat!("`[in]` frame of ", $name)]
        #[derive(Debug, Clone, Default, PartialEq)]
        pub struct $request {
            /// ORPC header; `None` marshals the default header
            pub this: Option<$crate::OrpcThis>,
            $(pub $in_field: $in_ty,)*
        }

        #[doc = concat!("`[out]` frame of ", $name)]
        #[derive(Debug, Clone, Default, PartialEq)]
        pub struct $response {
            /// ORPC header; `None` marshals the default header
            pub that: Option<$crate::OrpcThat>,
            $(pub $out_field: $out_ty,)*
            /// HRESULT status word
            pub return_value: i32,
        }

        impl $crate::__private::NdrEncode for $request {
            fn ndr_encode<'a>(
                &'a self,
                w: &mut $crate::__private::NdrWriter<'a>,
            ) -> $crate::__private::NdrResult<()> {
                $crate::__private::NdrEncode::ndr_encode($crate::__private::orpc_this_or_default(&self.this), w)?;
                w.write_deferred()?;
                $(
                    $crate::__pla_encode_param!($in_kind, w, self.$in_field);
                    w.write_deferred()?;
                )*
                Ok(())
            }
        }

        impl $crate::__private::NdrDecode for $request {
            fn ndr_decode<'a>(
                &'a mut self,
                r: &mut $crate::__private::NdrReader<'a>,
            ) -> $crate::__private::NdrResult<()> {
                let this = ::std::option::Option::insert(&mut self.this, $crate::OrpcThis::EMPTY);
                $crate::__private::NdrDecode::ndr_decode(this, r)?;
                r.read_deferred()?;
                $(
                    $crate::__pla_decode_param!($in_kind, r, self.$in_field);
                    r.read_deferred()?;
                )*
                Ok(())
            }
        }

        impl $crate::__private::NdrEncode for $response {
            fn ndr_encode<'a>(
                &'a self,
                w: &mut $crate::__private::NdrWriter<'a>,
            ) -> $crate::__private::NdrResult<()> {
                $crate::__private::NdrEncode::ndr_encode($crate::__private::orpc_that_or_default(&self.that), w)?;
                w.write_deferred()?;
                $(
                    $crate::__pla_encode_param!($out_kind, w, self.$out_field);
                    w.write_deferred()?;
                )*
                w.write_data(self.return_value);
                Ok(())
            }
        }

        impl $crate::__private::NdrDecode for $response {
            fn ndr_decode<'a>(
                &'a mut self,
                r: &mut $crate::__private::NdrReader<'a>,
            ) -> $crate::__private::NdrResult<()> {
                let that = ::std::option::Option::insert(&mut self.that, $crate::OrpcThat::default());
                $crate::__private::NdrDecode::ndr_decode(that, r)?;
                r.read_deferred()?;
                $(
                    $crate::__pla_decode_param!($out_kind, r, self.$out_field);
                    r.read_deferred()?;
                )*
                self.return_value = r.read_data()?;
                Ok(())
            }
        }

        impl $crate::OrpcRequest for $request {
            fn orpc_this_mut(&mut self) -> &mut Option<$crate::OrpcThis> {
                &mut self.this
            }
        }

        impl $crate::ResponseStatus for $response {
            fn status(&self) -> $crate::Hresult {
                $crate::Hresult::from_wire(self.return_value)
            }

            fn with_status(status: $crate::Hresult) -> Self {
                Self {
                    return_value: status.to_wire(),
                    ..Default::default()
                }
            }
        }

        impl $crate::Operation for $op {
            const OPNUM: u16 = $opnum;
            const NAME: &'static str = $name;
            type Request = $request;
            type Response = $response;
        }
    };
}
